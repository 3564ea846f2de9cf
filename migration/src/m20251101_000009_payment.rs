use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000008_invoice::Invoice;

static IDX_PAYMENT_INVOICE_ID: &str = "idx-payment-invoice_id";
static FK_PAYMENT_INVOICE_ID: &str = "fk-payment-invoice_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer(Payment::InvoiceId))
                    .col(decimal_len(Payment::Amount, 18, 2))
                    .col(string_len(Payment::Method, 50))
                    .col(string_len(Payment::Status, 20))
                    .col(string_len_null(Payment::TransactionId, 100))
                    .col(timestamp(Payment::PaymentDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PAYMENT_INVOICE_ID)
                    .table(Payment::Table)
                    .col(Payment::InvoiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYMENT_INVOICE_ID)
                    .from_tbl(Payment::Table)
                    .from_col(Payment::InvoiceId)
                    .to_tbl(Invoice::Table)
                    .to_col(Invoice::Id)
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
                    .name(FK_PAYMENT_INVOICE_ID)
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PAYMENT_INVOICE_ID)
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Payment {
    Table,
    Id,
    InvoiceId,
    Amount,
    Method,
    Status,
    TransactionId,
    PaymentDate,
}
