use model::entities::prelude::*;
use model::entities::{user, user_property};
use sea_orm_migration::{prelude::*, schema::*};

use crate::entity_iden::EntityIden;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create account_user table
        manager
            .create_table(
                Table::create()
                    .table(User::table())
                    .if_not_exists()
                    .col(pk_auto(User::column(user::Column::Id)))
                    .col(string_len(User::column(user::Column::Username), 64).unique_key())
                    .col(string_len(User::column(user::Column::Nickname), 64).default(""))
                    .col(string_len(User::column(user::Column::Password), 128))
                    .col(timestamp_with_time_zone_null(User::column(user::Column::LastLogin)))
                    .col(boolean(User::column(user::Column::IsStaff)).default(false))
                    .col(boolean(User::column(user::Column::IsActive)).default(true))
                    .col(boolean(User::column(user::Column::IsSuperuser)).default(false))
                    .col(timestamp_with_time_zone(User::column(user::Column::DateJoined)))
                    .to_owned(),
            )
            .await?;

        // Create account_user_property table
        manager
            .create_table(
                Table::create()
                    .table(UserProperty::table())
                    .if_not_exists()
                    .col(pk_auto(UserProperty::column(user_property::Column::Id)))
                    .col(integer(UserProperty::column(user_property::Column::UserId)))
                    .col(string_len(UserProperty::column(user_property::Column::Key), 64))
                    .col(text(UserProperty::column(user_property::Column::Value)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_user_property_user")
                            .from(
                                UserProperty::table(),
                                UserProperty::column(user_property::Column::UserId),
                            )
                            .to(User::table(), User::column(user::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One value per (user, key)
        manager
            .create_index(
                Index::create()
                    .name("idx_account_user_property_user_key")
                    .table(UserProperty::table())
                    .col(UserProperty::column(user_property::Column::UserId))
                    .col(UserProperty::column(user_property::Column::Key))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(UserProperty::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::table()).to_owned())
            .await?;

        Ok(())
    }
}
