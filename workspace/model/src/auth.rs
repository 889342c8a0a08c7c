//! The authentication contract a user account fulfils.
//!
//! - [`Credentials`]: storing and checking a password hash
//! - [`Permissions`]: the active/staff/superuser flags and what they grant
//! - [`IdentityLookup`]: finding an account by its unique login name

use sea_orm::ConnectionTrait;

use crate::entities::user;
use crate::error::Result;
use crate::password::{hash_password, is_password_usable, make_unusable_password, verify_password};

/// Password storage and verification.
///
/// Mutators only change the in-memory value; persist with
/// [`UserManager::change_password`](crate::manager::UserManager::change_password).
pub trait Credentials {
    /// The stored hash or unusable marker.
    fn password_hash(&self) -> &str;

    fn replace_password_hash(&mut self, encoded: String);

    fn set_password(&mut self, raw_password: &str) -> Result<()> {
        let encoded = hash_password(raw_password)?;
        self.replace_password_hash(encoded);
        Ok(())
    }

    fn set_unusable_password(&mut self) {
        self.replace_password_hash(make_unusable_password());
    }

    fn check_password(&self, raw_password: &str) -> bool {
        verify_password(raw_password, self.password_hash())
    }

    fn has_usable_password(&self) -> bool {
        is_password_usable(self.password_hash())
    }
}

/// Permission flags. There are no group or per-object permission tables, so an
/// active superuser holds every permission and everybody else holds none.
pub trait Permissions {
    fn is_active(&self) -> bool;
    fn is_staff(&self) -> bool;
    fn is_superuser(&self) -> bool;

    /// Staff members who are still active may use management interfaces.
    fn can_access_admin(&self) -> bool {
        self.is_active() && self.is_staff()
    }

    fn has_perm(&self, _perm: &str) -> bool {
        self.is_active() && self.is_superuser()
    }

    fn has_perms(&self, perms: &[&str]) -> bool {
        perms.iter().all(|perm| self.has_perm(perm))
    }
}

/// Lookup of an account by its unique identity.
#[allow(async_fn_in_trait)]
pub trait IdentityLookup {
    type Account;

    /// Name of the column holding the login identity.
    const USERNAME_FIELD: &'static str;

    /// Fields an interactive creation flow must ask for besides the identity and password.
    const REQUIRED_FIELDS: &'static [&'static str];

    async fn get_by_natural_key<C>(db: &C, username: &str) -> Result<Option<Self::Account>>
    where
        C: ConnectionTrait;
}

impl Credentials for user::Model {
    fn password_hash(&self) -> &str {
        &self.password
    }

    fn replace_password_hash(&mut self, encoded: String) {
        self.password = encoded;
    }
}

impl Permissions for user::Model {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn is_staff(&self) -> bool {
        self.is_staff
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}
