use anyhow::Result;
use model::UserManager;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

#[instrument(skip(db, value))]
pub async fn set_property(
    db: &DatabaseConnection,
    username: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let user = UserManager::require(db, username).await?;
    user.set_property(db, key, value).await?;
    Ok(())
}

/// `None` when the user exists but has no such property.
#[instrument(skip(db))]
pub async fn get_property(db: &DatabaseConnection, username: &str, key: &str) -> Result<Option<String>> {
    let user = UserManager::require(db, username).await?;
    let value = user.get_property(db, key).await?;
    debug!(found = value.is_some(), "Property lookup finished");
    Ok(value)
}
