use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder};
use tracing::{debug, info, instrument, trace};

use super::user_property;
// Kept qualified: the entity derive expands against the prelude's two-parameter `Result`.
use crate::error;
use crate::validation::validate_property_key;

/// Property key backing [`Model::avatar_url`].
pub const AVATAR_URL_KEY: &str = "avatar_url";

/// Represents a user account.
/// The username is the login identity; everything else about the user
/// that has no column of its own lives in `user_property`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Letters, digits and underscore, at most 64 characters.
    #[sea_orm(unique)]
    pub username: String,
    /// Display name. May be blank.
    pub nickname: String,
    /// Argon2id PHC string, or an unusable marker starting with `!`.
    pub password: String,
    pub last_login: Option<DateTimeUtc>,
    /// Designates whether the user can log into the admin site.
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    /// Unset this instead of deleting accounts.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user owns its properties; they are deleted with it.
    #[sea_orm(has_many = "super::user_property::Entity")]
    UserProperty,
}

impl Related<user_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProperty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `username(nickname)`, trimmed.
    pub fn get_full_name(&self) -> String {
        format!("{}({})", self.username, self.nickname).trim().to_string()
    }

    pub fn get_short_name(&self) -> &str {
        &self.nickname
    }

    /// Returns the value stored under `key`, or `None` if the user has no such property.
    #[instrument(skip(self, db), fields(user_id = self.id))]
    pub async fn get_property<C>(&self, db: &C, key: &str) -> error::Result<Option<String>>
    where
        C: ConnectionTrait,
    {
        trace!("Looking up user property");
        let property = self.find_property(db, key).await?;
        debug!(found = property.is_some(), "User property lookup finished");
        Ok(property.map(|p| p.value))
    }

    /// Creates the `(user, key)` property on first use and updates it in place afterwards.
    ///
    /// The lookup and the write are separate statements; wrap the call in a
    /// transaction if it must be atomic. A concurrent insert of the same key
    /// surfaces as a uniqueness violation.
    #[instrument(skip(self, db, value), fields(user_id = self.id))]
    pub async fn set_property<C>(&self, db: &C, key: &str, value: impl Into<String>) -> error::Result<()>
    where
        C: ConnectionTrait,
    {
        validate_property_key(key)?;
        let value = value.into();

        match self.find_property(db, key).await? {
            Some(existing) => {
                trace!(property_id = existing.id, "Updating existing user property");
                let mut property: user_property::ActiveModel = existing.into();
                property.value = Set(value);
                property.update(db).await?;
            }
            None => {
                trace!("Creating user property");
                user_property::ActiveModel {
                    user_id: Set(self.id),
                    key: Set(key.to_string()),
                    value: Set(value),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }

        info!("User property saved");
        Ok(())
    }

    /// Removes the property. Returns false when it was not set.
    #[instrument(skip(self, db), fields(user_id = self.id))]
    pub async fn delete_property<C>(&self, db: &C, key: &str) -> error::Result<bool>
    where
        C: ConnectionTrait,
    {
        let result = user_property::Entity::delete_many()
            .filter(user_property::Column::UserId.eq(self.id))
            .filter(user_property::Column::Key.eq(key))
            .exec(db)
            .await?;
        debug!(rows_affected = result.rows_affected, "User property deleted");
        Ok(result.rows_affected > 0)
    }

    /// All properties of this user, ordered by key.
    pub async fn properties<C>(&self, db: &C) -> error::Result<Vec<user_property::Model>>
    where
        C: ConnectionTrait,
    {
        let properties = self
            .find_related(user_property::Entity)
            .order_by_asc(user_property::Column::Key)
            .all(db)
            .await?;
        Ok(properties)
    }

    pub async fn avatar_url<C>(&self, db: &C) -> error::Result<Option<String>>
    where
        C: ConnectionTrait,
    {
        self.get_property(db, AVATAR_URL_KEY).await
    }

    pub async fn set_avatar_url<C>(&self, db: &C, url: impl Into<String>) -> error::Result<()>
    where
        C: ConnectionTrait,
    {
        self.set_property(db, AVATAR_URL_KEY, url).await
    }

    async fn find_property<C>(&self, db: &C, key: &str) -> error::Result<Option<user_property::Model>>
    where
        C: ConnectionTrait,
    {
        let property = user_property::Entity::find()
            .filter(user_property::Column::UserId.eq(self.id))
            .filter(user_property::Column::Key.eq(key))
            .one(db)
            .await?;
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccountError;
    use crate::manager::{NewUser, UserManager};
    use crate::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_full_and_short_name() {
        let db = setup_test_db().await;
        let alice = UserManager::create_user(&db, NewUser::new("alice").nickname("Alice A"))
            .await
            .unwrap();

        assert_eq!(alice.get_full_name(), "alice(Alice A)");
        assert_eq!(alice.get_short_name(), "Alice A");
    }

    #[tokio::test]
    async fn test_full_name_with_blank_nickname() {
        let db = setup_test_db().await;
        let bob = UserManager::create_user(&db, NewUser::new("bob")).await.unwrap();

        assert_eq!(bob.get_full_name(), "bob()");
        assert_eq!(bob.get_short_name(), "");
    }

    #[tokio::test]
    async fn test_set_then_get_property() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        user.set_property(&db, "k", "v").await.unwrap();

        assert_eq!(user.get_property(&db, "k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_get_unset_property_is_none() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        assert_eq!(user.get_property(&db, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_property_twice_updates_in_place() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        user.set_property(&db, "theme", "dark").await.unwrap();
        let first = user.properties(&db).await.unwrap();
        user.set_property(&db, "theme", "light").await.unwrap();
        let second = user.properties(&db).await.unwrap();

        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, first[0].id);
        assert_eq!(second[0].value, "light");
        assert_eq!(user_property::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_properties_are_scoped_per_user() {
        let db = setup_test_db().await;
        let alice = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();
        let bob = UserManager::create_user(&db, NewUser::new("bob")).await.unwrap();

        alice.set_property(&db, "color", "red").await.unwrap();
        bob.set_property(&db, "color", "blue").await.unwrap();

        assert_eq!(alice.get_property(&db, "color").await.unwrap().as_deref(), Some("red"));
        assert_eq!(bob.get_property(&db, "color").await.unwrap().as_deref(), Some("blue"));
    }

    #[tokio::test]
    async fn test_set_property_rejects_invalid_key() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        let err = user.set_property(&db, "not a key", "v").await.unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
        assert!(user.properties(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_property_value_is_unbounded_text() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();
        let long_value = "x".repeat(10_000);

        user.set_property(&db, "bio", long_value.clone()).await.unwrap();

        assert_eq!(user.get_property(&db, "bio").await.unwrap(), Some(long_value));
    }

    #[tokio::test]
    async fn test_avatar_url_accessors() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        assert_eq!(user.avatar_url(&db).await.unwrap(), None);

        user.set_avatar_url(&db, "https://example.com/a.png").await.unwrap();

        assert_eq!(
            user.avatar_url(&db).await.unwrap().as_deref(),
            Some("https://example.com/a.png")
        );
        assert_eq!(
            user.get_property(&db, AVATAR_URL_KEY).await.unwrap().as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[tokio::test]
    async fn test_properties_ordered_by_key() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        user.set_property(&db, "zeta", "1").await.unwrap();
        user.set_property(&db, "alpha", "2").await.unwrap();

        let keys: Vec<String> = user
            .properties(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_property() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();
        user.set_property(&db, "k", "v").await.unwrap();

        assert!(user.delete_property(&db, "k").await.unwrap());
        assert!(!user.delete_property(&db, "k").await.unwrap());
        assert_eq!(user.get_property(&db, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entity_model_round_trips_through_database() {
        let db = setup_test_db().await;
        let created = UserManager::create_user(&db, NewUser::new("alice").nickname("Alice A"))
            .await
            .unwrap();

        let loaded = Entity::find_by_id(created.id).one(&db).await.unwrap().unwrap();

        assert_eq!(loaded, created);
        let active: ActiveModel = loaded.into();
        assert_eq!(active.username, sea_orm::ActiveValue::Unchanged("alice".to_string()));
    }

    #[tokio::test]
    async fn test_property_key_length_limit() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();

        user.set_property(&db, &"k".repeat(64), "v").await.unwrap();
        let err = user.set_property(&db, &"k".repeat(65), "v").await.unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
        assert_eq!(user.properties(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_key_row_is_unique_violation() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();
        user.set_property(&db, "k", "v").await.unwrap();

        let db_error = user_property::ActiveModel {
            user_id: Set(user.id),
            key: Set("k".to_string()),
            value: Set("other".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap_err();

        assert!(AccountError::from(db_error).is_unique_violation());
        assert_eq!(user.get_property(&db, "k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_set_property_on_deleted_user_is_database_error() {
        let db = setup_test_db().await;
        let user = UserManager::create_user(&db, NewUser::new("alice")).await.unwrap();
        UserManager::delete_user(&db, "alice").await.unwrap();

        let err = user.set_property(&db, "k", "v").await.unwrap_err();

        assert!(matches!(err, AccountError::Database(_)));
        assert_eq!(user_property::Entity::find().count(&db).await.unwrap(), 0);
    }
}
