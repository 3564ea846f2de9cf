use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        bid::{BidDetailsDto, BidDto, BidWithShipmentDto, CompanyBidQuery, RejectBidDto},
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::bid::company::CompanyBidService,
    },
};

/// Lists bids received on the company's requests, cheapest first
#[utoipa::path(
    get,
    path = "/api/company/bids",
    tag = COMPANY_TAG,
    params(CompanyBidQuery),
    responses(
        (status = 200, description = "Bids with their shipment requests", body = Vec<BidWithShipmentDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CompanyBidQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bids = CompanyBidService::new(&state.db)
        .list(company_id, query)
        .await?;

    Ok(Json(bids))
}

/// Lists accepted bids that still need a contract
#[utoipa::path(
    get,
    path = "/api/company/bids/waiting-contracts",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "Accepted bids without a contract", body = Vec<BidWithShipmentDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn waiting_contracts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bids = CompanyBidService::new(&state.db)
        .waiting_contracts(company_id)
        .await?;

    Ok(Json(bids))
}

/// Shows a bid with the provider's rating
#[utoipa::path(
    get,
    path = "/api/company/bids/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    responses(
        (status = 200, description = "Bid details", body = BidDetailsDto),
        (status = 404, description = "Bid not found on the company's requests", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyBidService::new(&state.db).show(company_id, id).await?;

    Ok(Json(bid))
}

/// Accepts a submitted bid, assigning the request and rejecting competing bids
#[utoipa::path(
    post,
    path = "/api/company/bids/{id}/accept",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    responses(
        (status = 200, description = "Bid accepted", body = BidDto),
        (status = 404, description = "Bid not found on the company's requests", body = ErrorDto),
        (status = 409, description = "Bid is no longer Submitted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyBidService::new(&state.db)
        .accept(company_id, id)
        .await?;

    Ok(Json(bid))
}

/// Rejects a submitted bid
#[utoipa::path(
    post,
    path = "/api/company/bids/{id}/reject",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Bid ID")),
    request_body = RejectBidDto,
    responses(
        (status = 200, description = "Bid rejected", body = BidDto),
        (status = 404, description = "Bid not found on the company's requests", body = ErrorDto),
        (status = 409, description = "Bid is no longer Submitted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<RejectBidDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyBidService::new(&state.db)
        .reject(company_id, id, payload.notes)
        .await?;

    Ok(Json(bid))
}
