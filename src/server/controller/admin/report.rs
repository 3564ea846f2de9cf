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
        report::{RevenueQuery, RevenueReportDto, SavedRevenueReportDto},
    },
    server::{
        controller::{admin::ADMIN_TAG, util::authorize::admin_id},
        error::Error,
        model::app::AppState,
        service::report::ReportService,
    },
};

/// Computes platform revenue over a date range
///
/// Without dates the month ending today is reported.
#[utoipa::path(
    get,
    path = "/api/admin/reports/revenue",
    tag = ADMIN_TAG,
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue report", body = RevenueReportDto),
        (status = 400, description = "End date before start date", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn revenue(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RevenueQuery>,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let report = ReportService::new(&state.db, state.commission_percent)
        .revenue(query)
        .await?;

    Ok(Json(report))
}

/// Computes and stores a revenue report
#[utoipa::path(
    post,
    path = "/api/admin/reports/revenue",
    tag = ADMIN_TAG,
    params(RevenueQuery),
    responses(
        (status = 201, description = "Report saved", body = SavedRevenueReportDto),
        (status = 400, description = "End date before start date", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn save_revenue(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RevenueQuery>,
) -> Result<impl IntoResponse, Error> {
    let admin_id = admin_id(&state, &session).await?;

    let saved = ReportService::new(&state.db, state.commission_percent)
        .save_revenue(admin_id, query)
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Lists saved revenue reports, newest first
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Saved reports", body = Vec<SavedRevenueReportDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn saved_reports(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    admin_id(&state, &session).await?;

    let reports = ReportService::new(&state.db, state.commission_percent)
        .list()
        .await?;

    Ok(Json(reports))
}
