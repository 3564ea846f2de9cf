use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        shipment::{BrowseQuery, ShipmentDetailsDto, ShipmentPageDto},
    },
    server::{error::Error, model::app::AppState, service::shipment_request::ShipmentRequestService},
};

pub static SHIPMENT_TAG: &str = "shipments";

/// Browses shipment requests open for bidding
///
/// # Responses
/// - 200 (OK): One page of open requests with their bid counts
/// - 500 (Internal Server Error): Database failure
#[utoipa::path(
    get,
    path = "/api/shipments",
    tag = SHIPMENT_TAG,
    params(BrowseQuery),
    responses(
        (status = 200, description = "Open shipment requests", body = ShipmentPageDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<impl IntoResponse, Error> {
    let page = ShipmentRequestService::new(&state.db).browse(query).await?;

    Ok(Json(page))
}

/// Shows a shipment request with its bids and price statistics
#[utoipa::path(
    get,
    path = "/api/shipments/{id}",
    tag = SHIPMENT_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "Shipment request details", body = ShipmentDetailsDto),
        (status = 404, description = "Shipment request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let details = ShipmentRequestService::new(&state.db).details(id).await?;

    Ok(Json(details))
}
