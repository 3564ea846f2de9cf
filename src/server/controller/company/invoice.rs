use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        invoice::{InvoiceDetailsDto, InvoiceFilterQuery, InvoiceListItemDto},
    },
    server::{
        controller::{
            company::COMPANY_TAG,
            util::{authorize::company_id, upload::attachment},
        },
        error::Error,
        model::app::AppState,
        service::invoice::InvoiceService,
    },
};

/// Lists the company's invoices, newest first
#[utoipa::path(
    get,
    path = "/api/company/invoices",
    tag = COMPANY_TAG,
    params(InvoiceFilterQuery),
    responses(
        (status = 200, description = "Invoices with payment state", body = Vec<InvoiceListItemDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InvoiceFilterQuery>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let invoices = InvoiceService::new(&state.db)
        .list(company_id, query.filter.unwrap_or_default())
        .await?;

    Ok(Json(invoices))
}

#[utoipa::path(
    get,
    path = "/api/company/invoices/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice with contract and payments", body = InvoiceDetailsDto),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let invoice = InvoiceService::new(&state.db).show(company_id, id).await?;

    Ok(Json(invoice))
}

/// Downloads the invoice as plain text
#[utoipa::path(
    get,
    path = "/api/company/invoices/{id}/download",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "The rendered invoice as an attachment"),
        (status = 404, description = "Invoice not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let document = InvoiceService::new(&state.db)
        .download(company_id, id)
        .await?;

    Ok(attachment(
        &document.file_name,
        "text/plain; charset=utf-8",
        document.body.into_bytes(),
    ))
}
