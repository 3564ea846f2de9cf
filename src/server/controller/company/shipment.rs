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
        bid::ShipmentBidsDto,
        shipment::{
            ShipmentRequestDto, ShipmentRequestPayload, ShipmentStatusQuery, ShipmentSummaryDto,
        },
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::{bid::company::CompanyBidService, shipment_request::ShipmentRequestService},
    },
};

/// Lists the company's shipment requests, newest first
#[utoipa::path(
    get,
    path = "/api/company/shipments",
    tag = COMPANY_TAG,
    params(ShipmentStatusQuery),
    responses(
        (status = 200, description = "The company's requests with bid counts", body = Vec<ShipmentSummaryDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShipmentStatusQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let requests = ShipmentRequestService::new(&state.db)
        .list_for_company(company_id, query.status)
        .await?;

    Ok(Json(requests))
}

/// Posts a new shipment request
///
/// # Responses
/// - 201 (Created): Request created with status Pending
/// - 400 (Bad Request): A field failed validation
#[utoipa::path(
    post,
    path = "/api/company/shipments",
    tag = COMPANY_TAG,
    request_body = ShipmentRequestPayload,
    responses(
        (status = 201, description = "Shipment request created", body = ShipmentRequestDto),
        (status = 400, description = "Invalid shipment request", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ShipmentRequestPayload>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let request = ShipmentRequestService::new(&state.db)
        .create(company_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/company/shipments/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "The shipment request", body = ShipmentRequestDto),
        (status = 404, description = "Not one of the company's requests", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let request = ShipmentRequestService::new(&state.db)
        .get_for_company(company_id, id)
        .await?;

    Ok(Json(request))
}

/// Edits a shipment request that is still Pending or Bidding
#[utoipa::path(
    put,
    path = "/api/company/shipments/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    request_body = ShipmentRequestPayload,
    responses(
        (status = 200, description = "Shipment request updated", body = ShipmentRequestDto),
        (status = 400, description = "Invalid shipment request", body = ErrorDto),
        (status = 404, description = "Not one of the company's requests", body = ErrorDto),
        (status = 409, description = "Request can no longer be edited", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ShipmentRequestPayload>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let request = ShipmentRequestService::new(&state.db)
        .update(company_id, id, payload)
        .await?;

    Ok(Json(request))
}

/// Deletes a Pending or Bidding shipment request together with its bids
#[utoipa::path(
    delete,
    path = "/api/company/shipments/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "Shipment request deleted", body = MessageDto),
        (status = 404, description = "Not one of the company's requests", body = ErrorDto),
        (status = 409, description = "Request can no longer be deleted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    ShipmentRequestService::new(&state.db)
        .delete(company_id, id)
        .await?;

    Ok(Json(MessageDto::new("Shipment request deleted")))
}

/// Cancels a Pending, Bidding or Assigned shipment request
#[utoipa::path(
    post,
    path = "/api/company/shipments/{id}/cancel",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "Shipment request cancelled", body = ShipmentRequestDto),
        (status = 404, description = "Not one of the company's requests", body = ErrorDto),
        (status = 409, description = "Request can no longer be cancelled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let request = ShipmentRequestService::new(&state.db)
        .cancel(company_id, id)
        .await?;

    Ok(Json(request))
}

/// Lists the bids on one of the company's requests with price statistics
#[utoipa::path(
    get,
    path = "/api/company/shipments/{id}/bids",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Shipment request ID")),
    responses(
        (status = 200, description = "Bids on the request", body = ShipmentBidsDto),
        (status = 404, description = "Not one of the company's requests", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn bids(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bids = CompanyBidService::new(&state.db)
        .for_shipment(company_id, id)
        .await?;

    Ok(Json(bids))
}
