//! This file serves as the root for all SeaORM entity modules.
//! An account is a `user` row plus any number of `user_property` rows
//! keyed by name.

pub mod user;
pub mod user_property;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user::Entity as User;
    pub use super::user_property::Entity as UserProperty;
}
