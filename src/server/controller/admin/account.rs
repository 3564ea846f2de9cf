use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        admin::{AdminCompanyDto, AdminProviderDto, ApprovalDto},
        api::ErrorDto,
    },
    server::{
        controller::{admin::ADMIN_TAG, util::authorize::admin_id},
        error::Error,
        model::app::AppState,
        service::admin::AdminService,
    },
};

/// Lists every company with its shipment request and contract counts
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Companies with counts", body = Vec<AdminCompanyDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn companies(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let companies = AdminService::new(&state.db).companies().await?;

    Ok(Json(companies))
}

/// Approves a pending company or suspends an approved one
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/toggle-approval",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Company ID")),
    responses(
        (status = 200, description = "New approval state", body = ApprovalDto),
        (status = 404, description = "Company not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn toggle_company_approval(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let admin_id = admin_id(&state, &session).await?;

    let approval = AdminService::new(&state.db)
        .toggle_company_approval(admin_id, id)
        .await?;

    Ok(Json(approval))
}

/// Lists every provider with its bid and contract counts
#[utoipa::path(
    get,
    path = "/api/admin/providers",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Providers with counts", body = Vec<AdminProviderDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn providers(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let providers = AdminService::new(&state.db).providers().await?;

    Ok(Json(providers))
}

/// Approves a pending provider or suspends an approved one
#[utoipa::path(
    post,
    path = "/api/admin/providers/{id}/toggle-approval",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "New approval state", body = ApprovalDto),
        (status = 404, description = "Provider not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn toggle_provider_approval(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let admin_id = admin_id(&state, &session).await?;

    let approval = AdminService::new(&state.db)
        .toggle_provider_approval(admin_id, id)
        .await?;

    Ok(Json(approval))
}
