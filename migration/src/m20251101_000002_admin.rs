use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_wasl_user::WaslUser;

static FK_ADMIN_USER_ID: &str = "fk-admin-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admin::Table)
                    .if_not_exists()
                    .col(pk_auto(Admin::Id))
                    .col(integer_uniq(Admin::UserId))
                    .col(string_len(Admin::FirstName, 100))
                    .col(string_len(Admin::LastName, 100))
                    .col(string_len(Admin::Email, 150))
                    .col(string_len_null(Admin::PhoneNumber, 20))
                    .col(string_len(Admin::Status, 20))
                    .col(string_len_null(Admin::AdminRole, 50))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ADMIN_USER_ID)
                    .from_tbl(Admin::Table)
                    .from_col(Admin::UserId)
                    .to_tbl(WaslUser::Table)
                    .to_col(WaslUser::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_ADMIN_USER_ID)
                    .table(Admin::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Admin::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Admin {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Status,
    AdminRole,
}
