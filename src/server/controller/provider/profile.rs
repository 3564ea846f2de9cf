use axum::{extract::State, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        dashboard::ProviderDashboardDto,
        feedback::ProviderFeedbackDto,
        profile::{ProviderDto, UpdateProviderProfileDto},
    },
    server::{
        controller::{provider::PROVIDER_TAG, util::authorize::provider_id},
        error::Error,
        model::app::AppState,
        service::{
            dashboard::DashboardService, feedback::FeedbackService, profile::ProfileService,
        },
    },
};

/// Bid counters and rating for the provider
#[utoipa::path(
    get,
    path = "/api/provider/dashboard",
    tag = PROVIDER_TAG,
    responses(
        (status = 200, description = "Provider dashboard", body = ProviderDashboardDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a provider", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let dashboard = DashboardService::new(&state.db).provider(provider_id).await?;

    Ok(Json(dashboard))
}

/// Feedback left by companies with the average rating
#[utoipa::path(
    get,
    path = "/api/provider/feedback",
    tag = PROVIDER_TAG,
    responses(
        (status = 200, description = "The provider's feedback", body = ProviderFeedbackDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn feedback(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let feedback = FeedbackService::new(&state.db)
        .provider_feedback(provider_id)
        .await?;

    Ok(Json(feedback))
}

#[utoipa::path(
    get,
    path = "/api/provider/profile",
    tag = PROVIDER_TAG,
    responses(
        (status = 200, description = "The provider's profile", body = ProviderDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let profile = ProfileService::new(&state.db).provider(provider_id).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/provider/profile",
    tag = PROVIDER_TAG,
    request_body = UpdateProviderProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProviderDto),
        (status = 400, description = "A field failed validation", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProviderProfileDto>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let profile = ProfileService::new(&state.db)
        .update_provider(provider_id, payload)
        .await?;

    Ok(Json(profile))
}
