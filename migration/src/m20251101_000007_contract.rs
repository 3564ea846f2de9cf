use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000003_company::Company,
    m20251101_000004_provider::Provider,
    m20251101_000005_shipment_request::ShipmentRequest,
    m20251101_000006_bid::Bid,
};

static IDX_CONTRACT_COMPANY_ID: &str = "idx-contract-company_id";
static IDX_CONTRACT_PROVIDER_ID: &str = "idx-contract-provider_id";
static FK_CONTRACT_BID_ID: &str = "fk-contract-bid_id";
static FK_CONTRACT_COMPANY_ID: &str = "fk-contract-company_id";
static FK_CONTRACT_PROVIDER_ID: &str = "fk-contract-provider_id";
static FK_CONTRACT_SHIPMENT_REQUEST_ID: &str = "fk-contract-shipment_request_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contract::Table)
                    .if_not_exists()
                    .col(pk_auto(Contract::Id))
                    .col(integer_uniq(Contract::BidId))
                    .col(integer(Contract::CompanyId))
                    .col(integer(Contract::ProviderId))
                    .col(integer(Contract::ShipmentRequestId))
                    .col(string_len(Contract::Document, 255))
                    .col(timestamp_null(Contract::SignedAt))
                    .col(timestamp(Contract::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_COMPANY_ID)
                    .table(Contract::Table)
                    .col(Contract::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_PROVIDER_ID)
                    .table(Contract::Table)
                    .col(Contract::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_BID_ID)
                    .from_tbl(Contract::Table)
                    .from_col(Contract::BidId)
                    .to_tbl(Bid::Table)
                    .to_col(Bid::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_COMPANY_ID)
                    .from_tbl(Contract::Table)
                    .from_col(Contract::CompanyId)
                    .to_tbl(Company::Table)
                    .to_col(Company::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_PROVIDER_ID)
                    .from_tbl(Contract::Table)
                    .from_col(Contract::ProviderId)
                    .to_tbl(Provider::Table)
                    .to_col(Provider::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_SHIPMENT_REQUEST_ID)
                    .from_tbl(Contract::Table)
                    .from_col(Contract::ShipmentRequestId)
                    .to_tbl(ShipmentRequest::Table)
                    .to_col(ShipmentRequest::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CONTRACT_SHIPMENT_REQUEST_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CONTRACT_PROVIDER_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CONTRACT_COMPANY_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CONTRACT_BID_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CONTRACT_PROVIDER_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CONTRACT_COMPANY_ID)
                    .table(Contract::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Contract::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Contract {
    Table,
    Id,
    BidId,
    CompanyId,
    ProviderId,
    ShipmentRequestId,
    Document,
    SignedAt,
    CreatedAt,
}
