//! Creation and lookup of user accounts.

use std::fmt;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter,
};
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::auth::{Credentials, IdentityLookup, Permissions};
use crate::entities::user;
use crate::error::{AccountError, Result};
use crate::password::{hash_password, make_unusable_password};
use crate::validation::UserFields;

/// Input for [`UserManager::create_user`] and [`UserManager::create_superuser`].
#[derive(Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    /// `None` or an empty string leaves the account without a usable password.
    pub password: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("nickname", &self.nickname)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Factory and lookups for `user` rows.
pub struct UserManager;

impl UserManager {
    /// Creates an active user without staff or superuser rights.
    pub async fn create_user<C>(db: &C, new_user: NewUser) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        Self::insert_user(db, new_user, false, false).await
    }

    /// Creates an active user with both staff and superuser rights.
    pub async fn create_superuser<C>(db: &C, new_user: NewUser) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        Self::insert_user(db, new_user, true, true).await
    }

    #[instrument(skip(db), fields(username = %new_user.username))]
    async fn insert_user<C>(
        db: &C,
        new_user: NewUser,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let NewUser {
            username,
            nickname,
            password,
        } = new_user;

        if username.is_empty() {
            warn!("Rejected user creation without a username");
            return Err(AccountError::EmptyUsername);
        }

        let fields = UserFields { username, nickname };
        if let Err(errors) = fields.validate() {
            warn!(%errors, "Rejected invalid user fields");
            return Err(errors.into());
        }

        let password = match password.as_deref() {
            Some(raw) if !raw.is_empty() => hash_password(raw)?,
            _ => make_unusable_password(),
        };

        let new_user = user::ActiveModel {
            username: Set(fields.username),
            nickname: Set(fields.nickname),
            password: Set(password),
            last_login: Set(None),
            is_staff: Set(is_staff),
            is_active: Set(true),
            is_superuser: Set(is_superuser),
            date_joined: Set(Utc::now()),
            ..Default::default()
        };

        debug!("Inserting new user into database");
        match new_user.insert(db).await {
            Ok(user) => {
                info!(user_id = user.id, is_staff, is_superuser, "User created");
                Ok(user)
            }
            Err(db_error) => {
                error!(%db_error, "Failed to create user");
                Err(db_error.into())
            }
        }
    }

    /// Like [`IdentityLookup::get_by_natural_key`] but a missing user is an error.
    pub async fn require<C>(db: &C, username: &str) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        Self::get_by_natural_key(db, username)
            .await?
            .ok_or_else(|| AccountError::UserNotFound(username.to_string()))
    }

    /// Hashes and stores a new password, or an unusable one for `None`/empty input.
    #[instrument(skip(db, user, raw_password), fields(user_id = user.id))]
    pub async fn change_password<C>(
        db: &C,
        user: user::Model,
        raw_password: Option<&str>,
    ) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let mut changed = user.clone();
        match raw_password {
            Some(raw) if !raw.is_empty() => changed.set_password(raw)?,
            _ => changed.set_unusable_password(),
        }

        let mut active: user::ActiveModel = user.into();
        active.password = Set(changed.password);
        let updated = active.update(db).await?;
        info!(usable = updated.has_usable_password(), "Password changed");
        Ok(updated)
    }

    /// Returns the user when it exists, is active and the password matches.
    /// `last_login` is stamped on success.
    #[instrument(skip(db, raw_password))]
    pub async fn authenticate<C>(
        db: &C,
        username: &str,
        raw_password: &str,
    ) -> Result<Option<user::Model>>
    where
        C: ConnectionTrait,
    {
        let Some(user) = Self::get_by_natural_key(db, username).await? else {
            // Hash anyway so unknown usernames cost the same as wrong passwords.
            let _ = hash_password(raw_password);
            debug!("Authentication failed: unknown user");
            return Ok(None);
        };

        if !user.check_password(raw_password) {
            debug!(user_id = user.id, "Authentication failed: wrong password");
            return Ok(None);
        }
        if !user.is_active() {
            debug!(user_id = user.id, "Authentication failed: inactive user");
            return Ok(None);
        }

        let mut active: user::ActiveModel = user.into();
        active.last_login = Set(Some(Utc::now()));
        let user = active.update(db).await?;
        info!(user_id = user.id, "User authenticated");
        Ok(Some(user))
    }

    /// Deletes the user and, through the foreign key, all of its properties.
    #[instrument(skip(db))]
    pub async fn delete_user<C>(db: &C, username: &str) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let Some(user) = Self::get_by_natural_key(db, username).await? else {
            return Ok(false);
        };
        let user_id = user.id;
        user.delete(db).await?;
        info!(user_id, "User deleted");
        Ok(true)
    }
}

impl IdentityLookup for UserManager {
    type Account = user::Model;

    const USERNAME_FIELD: &'static str = "username";
    const REQUIRED_FIELDS: &'static [&'static str] = &["nickname"];

    async fn get_by_natural_key<C>(db: &C, username: &str) -> Result<Option<user::Model>>
    where
        C: ConnectionTrait,
    {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?;
        Ok(user)
    }
}
