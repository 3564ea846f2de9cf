use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_wasl_user::WaslUser, m20251101_000002_admin::Admin};

static IDX_PROVIDER_IS_APPROVED: &str = "idx-provider-is_approved";
static FK_PROVIDER_USER_ID: &str = "fk-provider-user_id";
static FK_PROVIDER_ADMIN_ID: &str = "fk-provider-admin_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(pk_auto(Provider::Id))
                    .col(integer_uniq(Provider::UserId))
                    .col(string_len(Provider::Name, 150))
                    .col(string_len(Provider::BusinessRegistrationNumber, 100))
                    .col(string_len(Provider::Address, 255))
                    .col(string_len(Provider::City, 100))
                    .col(string_len(Provider::Region, 100))
                    .col(text_null(Provider::ServiceDescription))
                    .col(string_len(Provider::Email, 150))
                    .col(string_len(Provider::PhoneNumber, 20))
                    .col(boolean(Provider::IsApproved))
                    .col(string_len(Provider::Status, 20))
                    .col(integer_null(Provider::AdminId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROVIDER_IS_APPROVED)
                    .table(Provider::Table)
                    .col(Provider::IsApproved)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PROVIDER_USER_ID)
                    .from_tbl(Provider::Table)
                    .from_col(Provider::UserId)
                    .to_tbl(WaslUser::Table)
                    .to_col(WaslUser::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PROVIDER_ADMIN_ID)
                    .from_tbl(Provider::Table)
                    .from_col(Provider::AdminId)
                    .to_tbl(Admin::Table)
                    .to_col(Admin::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PROVIDER_ADMIN_ID)
                    .table(Provider::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PROVIDER_USER_ID)
                    .table(Provider::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PROVIDER_IS_APPROVED)
                    .table(Provider::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Provider::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Provider {
    Table,
    Id,
    UserId,
    Name,
    BusinessRegistrationNumber,
    Address,
    City,
    Region,
    ServiceDescription,
    Email,
    PhoneNumber,
    IsApproved,
    Status,
    AdminId,
}
