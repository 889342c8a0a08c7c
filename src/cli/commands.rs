pub mod initdb;
pub mod properties;
pub mod show_user;
pub mod users;

pub use initdb::init_database;
pub use properties::{get_property, set_property};
pub use show_user::show_user;
pub use users::{check_password, create_user, delete_user, set_password};
