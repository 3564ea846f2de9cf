use chrono::NaiveDateTime;
use entity::status::ShipmentRequestStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{model::bid::BidDto, server::model::db::ShipmentRequestModel};

/// Fields a company supplies when creating or editing a shipment request
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentRequestPayload {
    pub goods_type: String,
    #[schema(value_type = String)]
    pub weight_kg: Decimal,
    pub pickup_location: String,
    pub pickup_city: String,
    pub pickup_region: String,
    pub delivery_location: String,
    pub delivery_city: String,
    pub delivery_region: String,
    pub delivery_deadline: NaiveDateTime,
    pub special_instructions: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentRequestDto {
    pub id: i32,
    pub company_id: i32,
    pub provider_id: Option<i32>,
    pub goods_type: String,
    #[schema(value_type = String)]
    pub weight_kg: Decimal,
    pub pickup_location: String,
    pub pickup_city: String,
    pub pickup_region: String,
    pub delivery_location: String,
    pub delivery_city: String,
    pub delivery_region: String,
    pub delivery_deadline: NaiveDateTime,
    #[schema(value_type = String)]
    pub status: ShipmentRequestStatus,
    pub special_instructions: Option<String>,
    pub requested_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ShipmentRequestModel> for ShipmentRequestDto {
    fn from(request: ShipmentRequestModel) -> Self {
        Self {
            id: request.id,
            company_id: request.company_id,
            provider_id: request.provider_id,
            goods_type: request.goods_type,
            weight_kg: request.weight_kg,
            pickup_location: request.pickup_location,
            pickup_city: request.pickup_city,
            pickup_region: request.pickup_region,
            delivery_location: request.delivery_location,
            delivery_city: request.delivery_city,
            delivery_region: request.delivery_region,
            delivery_deadline: request.delivery_deadline,
            status: request.status,
            special_instructions: request.special_instructions,
            requested_at: request.requested_at,
            updated_at: request.updated_at,
        }
    }
}

/// A shipment request with the number of bids placed on it
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentSummaryDto {
    pub request: ShipmentRequestDto,
    pub company_name: Option<String>,
    pub bid_count: u64,
}

/// Filters for the public shipment listing
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    /// Matches goods type and pickup or delivery city and region
    pub search: Option<String>,
    pub goods_type: Option<String>,
    /// Pickup region key
    pub region: Option<String>,
    /// Pickup city key
    pub city: Option<String>,
    /// One of `0-100`, `100-500`, `500-1000`, `1000+`
    pub weight_range: Option<String>,
    #[param(value_type = Option<String>)]
    pub status: Option<ShipmentRequestStatus>,
    /// `newest` (default), `deadline` or `weight`
    pub sort: Option<String>,
    pub page: Option<u64>,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipmentStatusQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<ShipmentRequestStatus>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentPageDto {
    pub items: Vec<ShipmentSummaryDto>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    /// Distinct goods types among open requests, for filter menus
    pub goods_types: Vec<String>,
}

/// Price statistics over the bids of one request
#[derive(Serialize, Deserialize, Default, utoipa::ToSchema)]
pub struct BidStatsDto {
    pub bid_count: u64,
    #[schema(value_type = Option<String>)]
    pub average_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    pub bidder_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentDetailsDto {
    pub request: ShipmentRequestDto,
    pub company_name: String,
    /// Ordered by price ascending
    pub bids: Vec<BidDto>,
    pub stats: BidStatsDto,
}
