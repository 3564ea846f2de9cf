use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000004_provider::Provider,
    m20251101_000005_shipment_request::ShipmentRequest,
};

static IDX_BID_SHIPMENT_REQUEST_ID: &str = "idx-bid-shipment_request_id";
static IDX_BID_PROVIDER_ID: &str = "idx-bid-provider_id";
static FK_BID_SHIPMENT_REQUEST_ID: &str = "fk-bid-shipment_request_id";
static FK_BID_PROVIDER_ID: &str = "fk-bid-provider_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bid::Table)
                    .if_not_exists()
                    .col(pk_auto(Bid::Id))
                    .col(integer(Bid::ShipmentRequestId))
                    .col(integer(Bid::ProviderId))
                    .col(decimal_len(Bid::Price, 18, 2))
                    .col(integer(Bid::EstimatedDeliveryDays))
                    .col(string_len_null(Bid::Notes, 500))
                    .col(string_len(Bid::Status, 20))
                    .col(timestamp(Bid::SubmittedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BID_SHIPMENT_REQUEST_ID)
                    .table(Bid::Table)
                    .col(Bid::ShipmentRequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BID_PROVIDER_ID)
                    .table(Bid::Table)
                    .col(Bid::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BID_SHIPMENT_REQUEST_ID)
                    .from_tbl(Bid::Table)
                    .from_col(Bid::ShipmentRequestId)
                    .to_tbl(ShipmentRequest::Table)
                    .to_col(ShipmentRequest::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BID_PROVIDER_ID)
                    .from_tbl(Bid::Table)
                    .from_col(Bid::ProviderId)
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
                    .name(FK_BID_PROVIDER_ID)
                    .table(Bid::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BID_SHIPMENT_REQUEST_ID)
                    .table(Bid::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_BID_PROVIDER_ID)
                    .table(Bid::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_BID_SHIPMENT_REQUEST_ID)
                    .table(Bid::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Bid::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Bid {
    Table,
    Id,
    ShipmentRequestId,
    ProviderId,
    Price,
    EstimatedDeliveryDays,
    Notes,
    Status,
    SubmittedAt,
}
