use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_wasl_user::WaslUser, m20251101_000002_admin::Admin};

static IDX_COMPANY_IS_APPROVED: &str = "idx-company-is_approved";
static FK_COMPANY_USER_ID: &str = "fk-company-user_id";
static FK_COMPANY_ADMIN_ID: &str = "fk-company-admin_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(integer_uniq(Company::UserId))
                    .col(string_len(Company::Name, 150))
                    .col(string_len(Company::BusinessRegistrationNumber, 100))
                    .col(string_len(Company::Address, 255))
                    .col(string_len(Company::City, 100))
                    .col(string_len(Company::Region, 100))
                    .col(string_len(Company::Email, 150))
                    .col(string_len(Company::PhoneNumber, 20))
                    .col(boolean(Company::IsApproved))
                    .col(string_len(Company::Status, 20))
                    .col(integer_null(Company::AdminId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMPANY_IS_APPROVED)
                    .table(Company::Table)
                    .col(Company::IsApproved)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMPANY_USER_ID)
                    .from_tbl(Company::Table)
                    .from_col(Company::UserId)
                    .to_tbl(WaslUser::Table)
                    .to_col(WaslUser::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMPANY_ADMIN_ID)
                    .from_tbl(Company::Table)
                    .from_col(Company::AdminId)
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
                    .name(FK_COMPANY_ADMIN_ID)
                    .table(Company::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_COMPANY_USER_ID)
                    .table(Company::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_COMPANY_IS_APPROVED)
                    .table(Company::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Company {
    Table,
    Id,
    UserId,
    Name,
    BusinessRegistrationNumber,
    Address,
    City,
    Region,
    Email,
    PhoneNumber,
    IsApproved,
    Status,
    AdminId,
}
