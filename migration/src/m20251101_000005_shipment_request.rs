use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_company::Company, m20251101_000004_provider::Provider};

static IDX_SHIPMENT_REQUEST_COMPANY_ID: &str = "idx-shipment_request-company_id";
static IDX_SHIPMENT_REQUEST_STATUS: &str = "idx-shipment_request-status";
static FK_SHIPMENT_REQUEST_COMPANY_ID: &str = "fk-shipment_request-company_id";
static FK_SHIPMENT_REQUEST_PROVIDER_ID: &str = "fk-shipment_request-provider_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShipmentRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(ShipmentRequest::Id))
                    .col(integer(ShipmentRequest::CompanyId))
                    .col(integer_null(ShipmentRequest::ProviderId))
                    .col(string_len(ShipmentRequest::GoodsType, 100))
                    .col(decimal_len(ShipmentRequest::WeightKg, 18, 2))
                    .col(string_len(ShipmentRequest::PickupLocation, 255))
                    .col(string_len(ShipmentRequest::PickupCity, 100))
                    .col(string_len(ShipmentRequest::PickupRegion, 100))
                    .col(string_len(ShipmentRequest::DeliveryLocation, 255))
                    .col(string_len(ShipmentRequest::DeliveryCity, 100))
                    .col(string_len(ShipmentRequest::DeliveryRegion, 100))
                    .col(timestamp(ShipmentRequest::DeliveryDeadline))
                    .col(string_len(ShipmentRequest::Status, 20))
                    .col(string_len_null(ShipmentRequest::SpecialInstructions, 255))
                    .col(timestamp(ShipmentRequest::RequestedAt))
                    .col(timestamp(ShipmentRequest::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SHIPMENT_REQUEST_COMPANY_ID)
                    .table(ShipmentRequest::Table)
                    .col(ShipmentRequest::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SHIPMENT_REQUEST_STATUS)
                    .table(ShipmentRequest::Table)
                    .col(ShipmentRequest::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SHIPMENT_REQUEST_COMPANY_ID)
                    .from_tbl(ShipmentRequest::Table)
                    .from_col(ShipmentRequest::CompanyId)
                    .to_tbl(Company::Table)
                    .to_col(Company::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SHIPMENT_REQUEST_PROVIDER_ID)
                    .from_tbl(ShipmentRequest::Table)
                    .from_col(ShipmentRequest::ProviderId)
                    .to_tbl(Provider::Table)
                    .to_col(Provider::Id)
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
                    .name(FK_SHIPMENT_REQUEST_PROVIDER_ID)
                    .table(ShipmentRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SHIPMENT_REQUEST_COMPANY_ID)
                    .table(ShipmentRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SHIPMENT_REQUEST_STATUS)
                    .table(ShipmentRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SHIPMENT_REQUEST_COMPANY_ID)
                    .table(ShipmentRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ShipmentRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ShipmentRequest {
    Table,
    Id,
    CompanyId,
    ProviderId,
    GoodsType,
    WeightKg,
    PickupLocation,
    PickupCity,
    PickupRegion,
    DeliveryLocation,
    DeliveryCity,
    DeliveryRegion,
    DeliveryDeadline,
    Status,
    SpecialInstructions,
    RequestedAt,
    UpdatedAt,
}
