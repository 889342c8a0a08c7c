use anyhow::Result;
use model::entities::user;
use model::{NewUser, UserManager};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

/// Create a regular or super user.
#[instrument(skip(db, password))]
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    nickname: &str,
    password: Option<&str>,
    superuser: bool,
) -> Result<user::Model> {
    let mut new_user = NewUser::new(username).nickname(nickname);
    if let Some(password) = password {
        new_user = new_user.password(password);
    }

    let user = if superuser {
        UserManager::create_superuser(db, new_user).await?
    } else {
        UserManager::create_user(db, new_user).await?
    };

    info!("Created user {} with ID {}", user.username, user.id);
    Ok(user)
}

/// Replace the stored password; `None` leaves the account without a usable one.
#[instrument(skip(db, password))]
pub async fn set_password(
    db: &DatabaseConnection,
    username: &str,
    password: Option<&str>,
) -> Result<user::Model> {
    let user = UserManager::require(db, username).await?;
    let user = UserManager::change_password(db, user, password).await?;
    Ok(user)
}

/// Returns whether the credentials would log the user in.
#[instrument(skip(db, password))]
pub async fn check_password(db: &DatabaseConnection, username: &str, password: &str) -> Result<bool> {
    let authenticated = UserManager::authenticate(db, username, password).await?;
    if authenticated.is_none() {
        warn!("Credentials rejected for {}", username);
    }
    Ok(authenticated.is_some())
}

#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, username: &str) -> Result<bool> {
    let deleted = UserManager::delete_user(db, username).await?;
    if !deleted {
        warn!("No user named {}", username);
    }
    Ok(deleted)
}
