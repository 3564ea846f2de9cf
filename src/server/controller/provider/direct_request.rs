use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto, PageQuery},
        bid::BidDto,
        direct_request::{DirectRequestPageDto, RespondDirectRequestDto},
    },
    server::{
        controller::{provider::PROVIDER_TAG, util::authorize::provider_id},
        error::Error,
        model::app::AppState,
        service::direct_request::provider::ProviderDirectRequestService,
    },
};

/// Lists direct requests sent to the provider
#[utoipa::path(
    get,
    path = "/api/provider/direct-requests",
    tag = PROVIDER_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "One page of direct requests", body = DirectRequestPageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a provider", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let page = ProviderDirectRequestService::new(&state.db)
        .list(provider_id, query.page.unwrap_or(1))
        .await?;

    Ok(Json(page))
}

/// Answers a direct request with a price and delivery estimate
#[utoipa::path(
    post,
    path = "/api/provider/direct-requests/{id}/respond",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Direct request bid ID")),
    request_body = RespondDirectRequestDto,
    responses(
        (status = 200, description = "Offer recorded", body = BidDto),
        (status = 400, description = "Invalid offer", body = ErrorDto),
        (status = 404, description = "Direct request not found", body = ErrorDto),
        (status = 409, description = "Direct request already decided", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn respond(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<RespondDirectRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let bid = ProviderDirectRequestService::new(&state.db)
        .respond(provider_id, id, payload)
        .await?;

    Ok(Json(bid))
}

/// Declines a direct request
#[utoipa::path(
    post,
    path = "/api/provider/direct-requests/{id}/decline",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Direct request bid ID")),
    responses(
        (status = 200, description = "Direct request declined", body = MessageDto),
        (status = 404, description = "Direct request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn decline(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    ProviderDirectRequestService::new(&state.db)
        .decline(provider_id, id)
        .await?;

    Ok(Json(MessageDto::new("Direct request declined")))
}
