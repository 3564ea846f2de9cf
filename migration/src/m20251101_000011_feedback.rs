use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000003_company::Company,
    m20251101_000004_provider::Provider,
    m20251101_000010_shipment::Shipment,
};

static IDX_FEEDBACK_PROVIDER_ID: &str = "idx-feedback-provider_id";
static FK_FEEDBACK_SHIPMENT_ID: &str = "fk-feedback-shipment_id";
static FK_FEEDBACK_COMPANY_ID: &str = "fk-feedback-company_id";
static FK_FEEDBACK_PROVIDER_ID: &str = "fk-feedback-provider_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(pk_auto(Feedback::Id))
                    .col(integer(Feedback::ShipmentId))
                    .col(integer(Feedback::CompanyId))
                    .col(integer(Feedback::ProviderId))
                    .col(integer(Feedback::Rating))
                    .col(string_len(Feedback::Comments, 500))
                    .col(timestamp(Feedback::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FEEDBACK_PROVIDER_ID)
                    .table(Feedback::Table)
                    .col(Feedback::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FEEDBACK_SHIPMENT_ID)
                    .from_tbl(Feedback::Table)
                    .from_col(Feedback::ShipmentId)
                    .to_tbl(Shipment::Table)
                    .to_col(Shipment::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FEEDBACK_COMPANY_ID)
                    .from_tbl(Feedback::Table)
                    .from_col(Feedback::CompanyId)
                    .to_tbl(Company::Table)
                    .to_col(Company::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FEEDBACK_PROVIDER_ID)
                    .from_tbl(Feedback::Table)
                    .from_col(Feedback::ProviderId)
                    .to_tbl(Provider::Table)
                    .to_col(Provider::Id)
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
                    .name(FK_FEEDBACK_PROVIDER_ID)
                    .table(Feedback::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_FEEDBACK_COMPANY_ID)
                    .table(Feedback::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_FEEDBACK_SHIPMENT_ID)
                    .table(Feedback::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_FEEDBACK_PROVIDER_ID)
                    .table(Feedback::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Feedback {
    Table,
    Id,
    ShipmentId,
    CompanyId,
    ProviderId,
    Rating,
    Comments,
    CreatedAt,
}
