use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000002_admin::Admin;

static FK_REVENUE_REPORT_ADMIN_ID: &str = "fk-revenue_report-admin_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevenueReport::Table)
                    .if_not_exists()
                    .col(pk_auto(RevenueReport::Id))
                    .col(integer_null(RevenueReport::AdminId))
                    .col(string_len(RevenueReport::PeriodCovered, 100))
                    .col(decimal_len(RevenueReport::TotalRevenue, 18, 2))
                    .col(decimal_len(RevenueReport::TotalCommission, 18, 2))
                    .col(timestamp(RevenueReport::GeneratedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REVENUE_REPORT_ADMIN_ID)
                    .from_tbl(RevenueReport::Table)
                    .from_col(RevenueReport::AdminId)
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
                    .name(FK_REVENUE_REPORT_ADMIN_ID)
                    .table(RevenueReport::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RevenueReport::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum RevenueReport {
    Table,
    Id,
    AdminId,
    PeriodCovered,
    TotalRevenue,
    TotalCommission,
    GeneratedAt,
}
