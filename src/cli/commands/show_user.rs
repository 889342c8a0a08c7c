use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use model::UserManager;
use model::auth::{Credentials, Permissions};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::instrument;

/// What `show-user` prints. The password hash is never included.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub nickname: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub has_usable_password: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub properties: BTreeMap<String, String>,
}

#[instrument(skip(db))]
pub async fn show_user(db: &DatabaseConnection, username: &str) -> Result<UserSummary> {
    let user = UserManager::require(db, username).await?;
    let properties = user
        .properties(db)
        .await?
        .into_iter()
        .map(|property| (property.key, property.value))
        .collect();

    Ok(UserSummary {
        id: user.id,
        full_name: user.get_full_name(),
        is_active: user.is_active(),
        is_staff: user.is_staff(),
        is_superuser: user.is_superuser(),
        has_usable_password: user.has_usable_password(),
        date_joined: user.date_joined,
        last_login: user.last_login,
        username: user.username,
        nickname: user.nickname,
        properties,
    })
}
