use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    bid::BidDto, contract::ContractDto, profile::ProviderDto, shipment::ShipmentRequestDto,
};

/// Filters for the provider directory
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProviderDirectoryQuery {
    /// Matches name, city or service description
    pub search: Option<String>,
    pub region: Option<String>,
    /// Keeps providers whose average rating is at least N and below N + 1
    pub rating: Option<i32>,
    /// `name` (default), `rating` or `projects`
    pub sort: Option<String>,
    pub page: Option<u64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderListItemDto {
    pub provider: ProviderDto,
    pub average_rating: Option<f64>,
    pub feedback_count: u64,
    pub contract_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderPageDto {
    pub items: Vec<ProviderListItemDto>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderDetailsDto {
    pub provider: ProviderDto,
    pub average_rating: Option<f64>,
    pub feedback_count: u64,
    /// Up to five contracts that reached delivery
    pub completed_contracts: Vec<ContractDto>,
    /// The company's pending requests that can be sent to this provider
    pub available_requests: Vec<ShipmentRequestDto>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SendDirectRequestDto {
    pub provider_id: i32,
    pub shipment_request_id: i32,
    pub message: Option<String>,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectRequestQuery {
    pub provider_id: Option<i32>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DirectRequestDto {
    pub bid: BidDto,
    pub shipment: ShipmentRequestDto,
    pub company_name: String,
    /// Whether the provider has filled in a price
    pub has_response: bool,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DirectRequestPageDto {
    pub items: Vec<DirectRequestDto>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// The provider's offer in answer to a direct request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RespondDirectRequestDto {
    #[schema(value_type = String)]
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
}
