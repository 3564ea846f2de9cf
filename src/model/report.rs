use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::server::model::db::RevenueReportModel;

/// Inclusive report range, defaults to the month ending today
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Signed contracts grouped by the status of their latest payment
///
/// A contract without any payment counts as pending.
#[derive(Serialize, Deserialize, Default, utoipa::ToSchema)]
pub struct PaymentBreakdownDto {
    pub completed: u64,
    pub pending: u64,
    pub failed: u64,
}

/// Revenue and platform commission for one calendar month
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MonthlyRevenueDto {
    pub label: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    #[schema(value_type = String)]
    pub commission: Decimal,
}

/// Spending of a company or earnings of a provider over the report range
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PartyRevenueDto {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub contract_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RevenueReportDto {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    #[schema(value_type = String)]
    pub commission_percent: Decimal,
    #[schema(value_type = String)]
    pub total_commission: Decimal,
    pub contract_count: u64,
    pub payments: PaymentBreakdownDto,
    pub monthly_revenue: Vec<MonthlyRevenueDto>,
    pub top_companies: Vec<PartyRevenueDto>,
    pub top_providers: Vec<PartyRevenueDto>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SavedRevenueReportDto {
    pub id: i32,
    pub admin_id: Option<i32>,
    pub period_covered: String,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    #[schema(value_type = String)]
    pub total_commission: Decimal,
    pub generated_at: NaiveDateTime,
}

impl From<RevenueReportModel> for SavedRevenueReportDto {
    fn from(report: RevenueReportModel) -> Self {
        Self {
            id: report.id,
            admin_id: report.admin_id,
            period_covered: report.period_covered,
            total_revenue: report.total_revenue,
            total_commission: report.total_commission,
            generated_at: report.generated_at,
        }
    }
}
