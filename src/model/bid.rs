use chrono::NaiveDateTime;
use entity::status::BidStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        profile::ProviderDto,
        shipment::{BidStatsDto, ShipmentRequestDto},
    },
    server::model::db::BidModel,
};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BidDto {
    pub id: i32,
    pub shipment_request_id: i32,
    pub provider_id: i32,
    pub provider_name: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub status: BidStatus,
    pub submitted_at: NaiveDateTime,
}

impl BidDto {
    pub fn with_provider_name(bid: BidModel, provider_name: Option<String>) -> Self {
        Self {
            provider_name,
            ..Self::from(bid)
        }
    }
}

impl From<BidModel> for BidDto {
    fn from(bid: BidModel) -> Self {
        Self {
            id: bid.id,
            shipment_request_id: bid.shipment_request_id,
            provider_id: bid.provider_id,
            provider_name: None,
            price: bid.price,
            estimated_delivery_days: bid.estimated_delivery_days,
            notes: bid.notes,
            status: bid.status,
            submitted_at: bid.submitted_at,
        }
    }
}

/// A bid together with the shipment request it was placed on
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BidWithShipmentDto {
    pub bid: BidDto,
    pub shipment: ShipmentRequestDto,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmitBidDto {
    pub shipment_request_id: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateBidDto {
    #[schema(value_type = String)]
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Default, utoipa::ToSchema)]
pub struct RejectBidDto {
    pub notes: Option<String>,
}

/// Filters for the company's bid listing
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyBidQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<BidStatus>,
    pub shipment_id: Option<i32>,
    /// Matches the provider name
    pub search: Option<String>,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BidStatusQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<BidStatus>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BidDetailsDto {
    pub bid: BidDto,
    pub shipment: ShipmentRequestDto,
    pub provider: ProviderDto,
    pub average_rating: Option<f64>,
    pub feedback_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentBidsDto {
    pub shipment: ShipmentRequestDto,
    pub bids: Vec<BidDto>,
    pub stats: BidStatsDto,
}
