use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    contract::ContractDto, profile::ProviderDto, shipment::ShipmentRequestDto,
};

/// An amount bucketed under a chart label such as `Mar` or `Mar 2025`
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MonthlyAmountDto {
    pub label: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ActivityDto {
    pub title: String,
    pub description: String,
    pub at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompanyDashboardDto {
    pub active_shipments: u64,
    pub pending_shipments: u64,
    pub completed_shipments: u64,
    pub contracts: u64,
    pub pending_bids: u64,
    #[schema(value_type = String)]
    pub total_spent: Decimal,
    /// Twelve buckets for the current year by contract sign date
    pub monthly_spending: Vec<MonthlyAmountDto>,
    pub recent_activities: Vec<ActivityDto>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderDashboardDto {
    pub total_bids: u64,
    pub active_bids: u64,
    pub won_contracts: u64,
    pub direct_requests: u64,
    pub average_rating: Option<f64>,
    pub review_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminDashboardDto {
    pub company_users: u64,
    pub provider_users: u64,
    pub companies: u64,
    pub approved_providers: u64,
    pub pending_providers: u64,
    pub shipment_requests: u64,
    pub active_shipment_requests: u64,
    pub contracts: u64,
    pub feedback: u64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub recent_requests: Vec<ShipmentRequestDto>,
    pub recent_contracts: Vec<ContractDto>,
    pub pending_provider_list: Vec<ProviderDto>,
}
