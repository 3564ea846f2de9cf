use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000007_contract::Contract;

static FK_INVOICE_CONTRACT_ID: &str = "fk-invoice-contract_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoice::Table)
                    .if_not_exists()
                    .col(pk_auto(Invoice::Id))
                    .col(integer_uniq(Invoice::ContractId))
                    .col(string_len_uniq(Invoice::InvoiceNumber, 100))
                    .col(timestamp(Invoice::IssuedAt))
                    .col(timestamp(Invoice::DueAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_INVOICE_CONTRACT_ID)
                    .from_tbl(Invoice::Table)
                    .from_col(Invoice::ContractId)
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
                    .name(FK_INVOICE_CONTRACT_ID)
                    .table(Invoice::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Invoice::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Invoice {
    Table,
    Id,
    ContractId,
    InvoiceNumber,
    IssuedAt,
    DueAt,
}
