use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        tracking::{
            ShipmentSnapshotDto, TrackingDetailsDto, TrackingListItemDto, TrackingStatusQuery,
            UpdateTrackingStatusDto,
        },
    },
    server::{
        controller::{provider::PROVIDER_TAG, util::authorize::provider_id},
        error::Error,
        model::app::AppState,
        service::tracking::ProviderTrackingService,
    },
};

/// Lists shipment snapshots across the provider's contracts, newest first
#[utoipa::path(
    get,
    path = "/api/provider/shipments",
    tag = PROVIDER_TAG,
    params(TrackingStatusQuery),
    responses(
        (status = 200, description = "Shipment snapshots", body = Vec<TrackingListItemDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a provider", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<TrackingStatusQuery>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let shipments = ProviderTrackingService::new(&state.db)
        .list(provider_id, query.status)
        .await?;

    Ok(Json(shipments))
}

#[utoipa::path(
    get,
    path = "/api/provider/shipments/{id}",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Shipment snapshot ID")),
    responses(
        (status = 200, description = "Snapshot with its full history", body = TrackingDetailsDto),
        (status = 404, description = "Shipment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let details = ProviderTrackingService::new(&state.db)
        .show(provider_id, id)
        .await?;

    Ok(Json(details))
}

/// Moves a shipment forward by appending a new snapshot
///
/// # Responses
/// - 200 (OK): New snapshot recorded, Delivered also completes the shipment request
/// - 404 (Not Found): Shipment not found
/// - 409 (Conflict): Status would not move forward or the shipment is delivered
#[utoipa::path(
    post,
    path = "/api/provider/shipments/{id}/status",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Shipment snapshot ID")),
    request_body = UpdateTrackingStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ShipmentSnapshotDto),
        (status = 404, description = "Shipment not found", body = ErrorDto),
        (status = 409, description = "Status cannot move backwards", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTrackingStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let snapshot = ProviderTrackingService::new(&state.db)
        .update_status(provider_id, id, payload.status)
        .await?;

    Ok(Json(snapshot))
}
