use axum::{extract::State, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        admin::{AdminProfileDto, UpdateAdminProfileDto},
        api::ErrorDto,
        dashboard::AdminDashboardDto,
    },
    server::{
        controller::{
            admin::ADMIN_TAG,
            util::authorize::{admin_id, authorize},
        },
        error::Error,
        model::{app::AppState, auth::Policy},
        service::{admin::AdminService, dashboard::DashboardService},
    },
};

/// Platform totals, revenue and recent activity
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboardDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let dashboard = DashboardService::new(&state.db).admin().await?;

    Ok(Json(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/admin/profile",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "The admin's profile", body = AdminProfileDto),
        (status = 404, description = "Admin profile not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let actor = authorize(&session, Policy::AdminOnly).await?;

    let profile = AdminService::new(&state.db).profile(actor.user_id).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/admin/profile",
    tag = ADMIN_TAG,
    request_body = UpdateAdminProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = AdminProfileDto),
        (status = 400, description = "A field failed validation", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateAdminProfileDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = authorize(&session, Policy::AdminOnly).await?;

    let profile = AdminService::new(&state.db)
        .update_profile(actor.user_id, payload)
        .await?;

    Ok(Json(profile))
}
