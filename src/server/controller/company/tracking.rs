use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        feedback::{FeedbackDto, SubmitFeedbackDto},
        tracking::{ContractTrackingDto, TrackingLookupDto, TrackingLookupQuery},
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::{feedback::FeedbackService, tracking::CompanyTrackingService},
    },
};

/// Lists the company's contracts with their latest tracking snapshot
#[utoipa::path(
    get,
    path = "/api/company/tracking",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "Contracts with tracking state", body = Vec<ContractTrackingDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn contracts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let contracts = CompanyTrackingService::new(&state.db)
        .contracts(company_id)
        .await?;

    Ok(Json(contracts))
}

/// Looks up a shipment by contract ID or tracking number
///
/// The contract ID takes precedence when both are given.
#[utoipa::path(
    get,
    path = "/api/company/tracking/lookup",
    tag = COMPANY_TAG,
    params(TrackingLookupQuery),
    responses(
        (status = 200, description = "Tracking history and feedback eligibility", body = TrackingLookupDto),
        (status = 400, description = "Neither contract ID nor tracking number given", body = ErrorDto),
        (status = 404, description = "No matching contract or shipment", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn lookup(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<TrackingLookupQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let tracking = CompanyTrackingService::new(&state.db)
        .lookup(company_id, query)
        .await?;

    Ok(Json(tracking))
}

/// Rates the provider of a delivered shipment
///
/// # Responses
/// - 201 (Created): Feedback recorded
/// - 400 (Bad Request): Rating or comments out of range
/// - 404 (Not Found): Contract not found
/// - 409 (Conflict): Shipment not delivered or feedback already given
#[utoipa::path(
    post,
    path = "/api/company/feedback",
    tag = COMPANY_TAG,
    request_body = SubmitFeedbackDto,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackDto),
        (status = 400, description = "Invalid rating or comments", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 409, description = "Not delivered or already rated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SubmitFeedbackDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let feedback = FeedbackService::new(&state.db)
        .submit(company_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}
