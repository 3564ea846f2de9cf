use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        bid::{BidDto, BidStatusQuery, BidWithShipmentDto, SubmitBidDto, UpdateBidDto},
    },
    server::{
        controller::{provider::PROVIDER_TAG, util::authorize::provider_id},
        error::Error,
        model::app::AppState,
        service::bid::provider::ProviderBidService,
    },
};

/// Lists the provider's bids, newest first
#[utoipa::path(
    get,
    path = "/api/provider/bids",
    tag = PROVIDER_TAG,
    params(BidStatusQuery),
    responses(
        (status = 200, description = "Bids with their shipment requests", body = Vec<BidWithShipmentDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a provider", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BidStatusQuery>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let bids = ProviderBidService::new(&state.db)
        .list(provider_id, query.status)
        .await?;

    Ok(Json(bids))
}

/// Bids on an open shipment request
///
/// # Responses
/// - 201 (Created): Bid submitted, a Pending request moves to Bidding
/// - 400 (Bad Request): Price or delivery days out of range
/// - 404 (Not Found): Shipment request not found
/// - 409 (Conflict): Request not open or already bid on by this provider
#[utoipa::path(
    post,
    path = "/api/provider/bids",
    tag = PROVIDER_TAG,
    request_body = SubmitBidDto,
    responses(
        (status = 201, description = "Bid submitted", body = BidDto),
        (status = 400, description = "Invalid bid", body = ErrorDto),
        (status = 404, description = "Shipment request not found", body = ErrorDto),
        (status = 409, description = "Request not open or already bid on", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SubmitBidDto>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let bid = ProviderBidService::new(&state.db)
        .submit(provider_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(bid)))
}

/// Revises a bid that is still Submitted
#[utoipa::path(
    put,
    path = "/api/provider/bids/{id}",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    request_body = UpdateBidDto,
    responses(
        (status = 200, description = "Bid updated", body = BidDto),
        (status = 400, description = "Invalid bid", body = ErrorDto),
        (status = 404, description = "Bid not found", body = ErrorDto),
        (status = 409, description = "Bid is no longer Submitted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBidDto>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let bid = ProviderBidService::new(&state.db)
        .update(provider_id, id, payload)
        .await?;

    Ok(Json(bid))
}

/// Withdraws a Submitted or UnderReview bid
#[utoipa::path(
    delete,
    path = "/api/provider/bids/{id}",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    responses(
        (status = 200, description = "Bid withdrawn", body = MessageDto),
        (status = 404, description = "Bid not found", body = ErrorDto),
        (status = 409, description = "Bid can no longer be withdrawn", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    ProviderBidService::new(&state.db)
        .cancel(provider_id, id)
        .await?;

    Ok(Json(MessageDto::new("Bid withdrawn")))
}
