use axum::{extract::State, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        dashboard::CompanyDashboardDto,
        profile::{CompanyDto, DeleteAccountDto, UpdateCompanyProfileDto},
    },
    server::{
        controller::{company::COMPANY_TAG, util::authorize::company_id},
        error::Error,
        model::app::AppState,
        service::{dashboard::DashboardService, profile::ProfileService},
    },
};

/// Counters, spending and recent activity for the company
#[utoipa::path(
    get,
    path = "/api/company/dashboard",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "Company dashboard", body = CompanyDashboardDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let dashboard = DashboardService::new(&state.db).company(company_id).await?;

    Ok(Json(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/company/profile",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "The company's profile", body = CompanyDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let profile = ProfileService::new(&state.db).company(company_id).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/company/profile",
    tag = COMPANY_TAG,
    request_body = UpdateCompanyProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = CompanyDto),
        (status = 400, description = "A field failed validation", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateCompanyProfileDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let profile = ProfileService::new(&state.db)
        .update_company(company_id, payload)
        .await?;

    Ok(Json(profile))
}

/// Deletes the company account after confirming the password
///
/// Removes the company's shipment requests and their bids, then ends the session.
///
/// # Responses
/// - 200 (OK): Account deleted and session cleared
/// - 400 (Bad Request): Password is incorrect
/// - 409 (Conflict): The company has contracts
#[utoipa::path(
    delete,
    path = "/api/company/profile",
    tag = COMPANY_TAG,
    request_body = DeleteAccountDto,
    responses(
        (status = 200, description = "Account deleted", body = MessageDto),
        (status = 400, description = "Incorrect password", body = ErrorDto),
        (status = 409, description = "Company has contracts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_account(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DeleteAccountDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    ProfileService::new(&state.db)
        .delete_company(company_id, payload)
        .await?;

    session.clear().await;

    Ok(Json(MessageDto::new("Account deleted")))
}
