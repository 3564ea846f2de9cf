use chrono::NaiveDateTime;
use entity::status::TrackingStatus;
use serde::{Deserialize, Serialize};

use crate::{
    model::{contract::ContractDto, shipment::ShipmentRequestDto},
    server::model::db::ShipmentModel,
};

/// One append-only tracking snapshot
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShipmentSnapshotDto {
    pub id: i32,
    pub contract_id: i32,
    pub tracking_number: String,
    #[schema(value_type = String)]
    pub status: TrackingStatus,
    pub started_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
}

impl From<ShipmentModel> for ShipmentSnapshotDto {
    fn from(shipment: ShipmentModel) -> Self {
        Self {
            id: shipment.id,
            contract_id: shipment.contract_id,
            tracking_number: shipment.tracking_number,
            status: shipment.status,
            started_at: shipment.started_at,
            delivered_at: shipment.delivered_at,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateTrackingStatusDto {
    #[schema(value_type = String)]
    pub status: TrackingStatus,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrackingStatusQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<TrackingStatus>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct TrackingDetailsDto {
    pub snapshot: ShipmentSnapshotDto,
    /// Every snapshot sharing the tracking number, oldest first
    pub history: Vec<ShipmentSnapshotDto>,
    pub shipment: ShipmentRequestDto,
}

/// A tracking snapshot listed with its shipment request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct TrackingListItemDto {
    pub snapshot: ShipmentSnapshotDto,
    pub shipment: ShipmentRequestDto,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContractTrackingDto {
    pub contract: ContractDto,
    pub shipment: ShipmentRequestDto,
    pub provider_name: String,
    pub latest_snapshot: Option<ShipmentSnapshotDto>,
}

/// Look a shipment up by contract ID or tracking number
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrackingLookupQuery {
    pub contract_id: Option<i32>,
    pub tracking_number: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct TrackingLookupDto {
    pub contract: ContractDto,
    pub shipment: ShipmentRequestDto,
    pub provider_name: String,
    /// Oldest first
    pub history: Vec<ShipmentSnapshotDto>,
    pub latest_snapshot: Option<ShipmentSnapshotDto>,
    pub can_provide_feedback: bool,
    pub has_provided_feedback: bool,
}
