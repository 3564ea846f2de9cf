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
        bid::BidDto,
        direct_request::{
            DirectRequestDto, DirectRequestQuery, ProviderDetailsDto, ProviderDirectoryQuery,
            ProviderPageDto, SendDirectRequestDto,
        },
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::direct_request::{
            company::CompanyDirectRequestService, directory::ProviderDirectoryService,
        },
    },
};

/// Browses approved providers
#[utoipa::path(
    get,
    path = "/api/company/providers",
    tag = COMPANY_TAG,
    params(ProviderDirectoryQuery),
    responses(
        (status = 200, description = "One page of providers with ratings", body = ProviderPageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn providers(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProviderDirectoryQuery>,
) -> Result<impl IntoResponse, Error> {
    company_id(&state, &session).await?;

    let page = ProviderDirectoryService::new(&state.db)
        .providers(query)
        .await?;

    Ok(Json(page))
}

/// Shows an approved provider with completed work and requests it could receive
#[utoipa::path(
    get,
    path = "/api/company/providers/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider details", body = ProviderDetailsDto),
        (status = 404, description = "Provider not found or not approved", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn provider_details(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let details = ProviderDirectoryService::new(&state.db)
        .provider_details(company_id, id)
        .await?;

    Ok(Json(details))
}

/// Sends one of the company's open requests directly to a provider
///
/// # Responses
/// - 201 (Created): Direct request created and the shipment request held for the provider
/// - 404 (Not Found): Provider or shipment request not found
/// - 409 (Conflict): Request not open or already sent to this provider
#[utoipa::path(
    post,
    path = "/api/company/direct-requests",
    tag = COMPANY_TAG,
    request_body = SendDirectRequestDto,
    responses(
        (status = 201, description = "Direct request sent", body = BidDto),
        (status = 400, description = "Message too long", body = ErrorDto),
        (status = 404, description = "Provider or shipment request not found", body = ErrorDto),
        (status = 409, description = "Request not open or already sent", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SendDirectRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyDirectRequestService::new(&state.db)
        .send(company_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(bid)))
}

/// Lists the company's pending direct requests
#[utoipa::path(
    get,
    path = "/api/company/direct-requests",
    tag = COMPANY_TAG,
    params(DirectRequestQuery),
    responses(
        (status = 200, description = "Direct requests awaiting a decision", body = Vec<DirectRequestDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DirectRequestQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let requests = CompanyDirectRequestService::new(&state.db)
        .list(company_id, query.provider_id)
        .await?;

    Ok(Json(requests))
}

/// Withdraws a direct request
#[utoipa::path(
    delete,
    path = "/api/company/direct-requests/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Direct request bid ID")),
    responses(
        (status = 200, description = "Direct request withdrawn", body = MessageDto),
        (status = 404, description = "Direct request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    CompanyDirectRequestService::new(&state.db)
        .delete(company_id, id)
        .await?;

    Ok(Json(MessageDto::new("Direct request withdrawn")))
}

/// Accepts the provider's offer on a direct request
#[utoipa::path(
    post,
    path = "/api/company/direct-requests/{id}/accept",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Direct request bid ID")),
    responses(
        (status = 200, description = "Offer accepted", body = BidDto),
        (status = 404, description = "Direct request not found", body = ErrorDto),
        (status = 409, description = "Provider has not responded yet", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyDirectRequestService::new(&state.db)
        .accept(company_id, id)
        .await?;

    Ok(Json(bid))
}

/// Rejects the provider's offer on a direct request
#[utoipa::path(
    post,
    path = "/api/company/direct-requests/{id}/reject",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Direct request bid ID")),
    responses(
        (status = 200, description = "Offer rejected", body = BidDto),
        (status = 404, description = "Direct request not found", body = ErrorDto),
        (status = 409, description = "Provider has not responded yet", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let bid = CompanyDirectRequestService::new(&state.db)
        .reject(company_id, id)
        .await?;

    Ok(Json(bid))
}
