use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        contract::ContractSummaryDto,
        feedback::FeedbackDto,
        shipment::ShipmentSummaryDto,
    },
    server::{
        controller::{admin::ADMIN_TAG, util::authorize::admin_id},
        error::Error,
        model::app::AppState,
        service::{admin::AdminService, feedback::FeedbackService},
    },
};

/// Lists every shipment request with its bid count, newest first
#[utoipa::path(
    get,
    path = "/api/admin/shipments",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Shipment requests", body = Vec<ShipmentSummaryDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn shipment_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let requests = AdminService::new(&state.db).shipment_requests().await?;

    Ok(Json(requests))
}

/// Deletes a shipment request and its bids
#[utoipa::path(
    delete,
    path = "/api/admin/shipments/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "Shipment request deleted", body = MessageDto),
        (status = 404, description = "Shipment request not found", body = ErrorDto),
        (status = 409, description = "A contract references the request", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_shipment_request(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    AdminService::new(&state.db)
        .delete_shipment_request(id)
        .await?;

    Ok(Json(MessageDto::new("Shipment request deleted")))
}

#[utoipa::path(
    delete,
    path = "/api/admin/bids/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    responses(
        (status = 200, description = "Bid deleted", body = MessageDto),
        (status = 404, description = "Bid not found", body = ErrorDto),
        (status = 409, description = "A contract references the bid", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_bid(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    AdminService::new(&state.db).delete_bid(id).await?;

    Ok(Json(MessageDto::new("Bid deleted")))
}

/// Lists every contract, newest first
#[utoipa::path(
    get,
    path = "/api/admin/contracts",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Contracts", body = Vec<ContractSummaryDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn contracts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let contracts = AdminService::new(&state.db).contracts().await?;

    Ok(Json(contracts))
}

/// Lists all feedback for moderation
#[utoipa::path(
    get,
    path = "/api/admin/feedback",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Feedback with company and provider names", body = Vec<FeedbackDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn feedback(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let feedback = FeedbackService::new(&state.db).list_all().await?;

    Ok(Json(feedback))
}

#[utoipa::path(
    delete,
    path = "/api/admin/feedback/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback deleted", body = MessageDto),
        (status = 404, description = "Feedback not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    FeedbackService::new(&state.db).delete(id).await?;

    Ok(Json(MessageDto::new("Feedback deleted")))
}
