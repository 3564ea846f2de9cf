use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000007_contract::Contract;

static IDX_SHIPMENT_CONTRACT_ID: &str = "idx-shipment-contract_id";
static IDX_SHIPMENT_TRACKING_NUMBER: &str = "idx-shipment-tracking_number";
static FK_SHIPMENT_CONTRACT_ID: &str = "fk-shipment-contract_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipment::Table)
                    .if_not_exists()
                    .col(pk_auto(Shipment::Id))
                    .col(integer(Shipment::ContractId))
                    .col(string_len(Shipment::TrackingNumber, 100))
                    .col(string_len(Shipment::Status, 20))
                    .col(timestamp(Shipment::StartedAt))
                    .col(timestamp_null(Shipment::DeliveredAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SHIPMENT_CONTRACT_ID)
                    .table(Shipment::Table)
                    .col(Shipment::ContractId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SHIPMENT_TRACKING_NUMBER)
                    .table(Shipment::Table)
                    .col(Shipment::TrackingNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SHIPMENT_CONTRACT_ID)
                    .from_tbl(Shipment::Table)
                    .from_col(Shipment::ContractId)
                    .to_tbl(Contract::Table)
                    .to_col(Contract::Id)
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
                    .name(FK_SHIPMENT_CONTRACT_ID)
                    .table(Shipment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SHIPMENT_TRACKING_NUMBER)
                    .table(Shipment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SHIPMENT_CONTRACT_ID)
                    .table(Shipment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Shipment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Shipment {
    Table,
    Id,
    ContractId,
    TrackingNumber,
    Status,
    StartedAt,
    DeliveredAt,
}
