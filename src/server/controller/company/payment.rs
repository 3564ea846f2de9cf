use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        payment::{
            CardDetailsDto, PaymentDetailsDto, PaymentDto, PaymentListItemDto, PaymentStatusQuery,
        },
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::payment::PaymentService,
    },
};

/// Lists the company's payments, newest first
#[utoipa::path(
    get,
    path = "/api/company/payments",
    tag = COMPANY_TAG,
    params(PaymentStatusQuery),
    responses(
        (status = 200, description = "Payments with their invoice and provider", body = Vec<PaymentListItemDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaymentStatusQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let payments = PaymentService::new(&state.db, state.gateway.as_ref())
        .list(company_id, query.status)
        .await?;

    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/api/company/payments/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment with its invoice, contract, request and provider", body = PaymentDetailsDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let payment = PaymentService::new(&state.db, state.gateway.as_ref())
        .show(company_id, id)
        .await?;

    Ok(Json(payment))
}

/// Charges a pending payment through the gateway
#[utoipa::path(
    post,
    path = "/api/company/payments/{id}/process",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = CardDetailsDto,
    responses(
        (status = 200, description = "Payment successful", body = PaymentDto),
        (status = 400, description = "Card details malformed or expired", body = ErrorDto),
        (status = 402, description = "Payment declined", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 409, description = "Payment is not Pending or the contract is paid", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn process(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(card): Json<CardDetailsDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let payment = PaymentService::new(&state.db, state.gateway.as_ref())
        .process(company_id, id, card)
        .await?;

    Ok(Json(payment))
}

/// Resets a failed payment to Pending so it can be processed again
#[utoipa::path(
    post,
    path = "/api/company/payments/{id}/retry",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment reset to Pending", body = PaymentDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 409, description = "Payment is not Failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn retry(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let payment = PaymentService::new(&state.db, state.gateway.as_ref())
        .retry(company_id, id)
        .await?;

    Ok(Json(payment))
}
