use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        contract::{ContractDetailsDto, ContractDto, ContractFilterQuery, ContractSummaryDto},
        tracking::ShipmentSnapshotDto,
    },
    server::{
        controller::{
            provider::PROVIDER_TAG,
            util::{
                authorize::provider_id,
                upload::{attachment, UploadForm, DOCUMENT_FIELD},
            },
        },
        error::Error,
        model::app::AppState,
        service::{contract::provider::ProviderContractService, tracking::ProviderTrackingService},
    },
};

/// Multipart form for signing a contract
#[derive(utoipa::ToSchema)]
pub struct SignContractForm {
    /// Must be `true`
    pub terms_accepted: bool,
    /// The signed copy as a `.pdf`
    #[schema(value_type = String, format = Binary)]
    pub document: Vec<u8>,
}

/// Lists the provider's contracts
#[utoipa::path(
    get,
    path = "/api/provider/contracts",
    tag = PROVIDER_TAG,
    params(ContractFilterQuery),
    responses(
        (status = 200, description = "Contracts, optionally narrowed by sign state", body = Vec<ContractSummaryDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a provider", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ContractFilterQuery>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let contracts = ProviderContractService::new(&state.db, &state.documents)
        .list(provider_id, query.filter.unwrap_or_default())
        .await?;

    Ok(Json(contracts))
}

#[utoipa::path(
    get,
    path = "/api/provider/contracts/{id}",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract with its latest shipment snapshot", body = ContractDetailsDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let contract = ProviderContractService::new(&state.db, &state.documents)
        .show(provider_id, id)
        .await?;

    Ok(Json(contract))
}

/// Signs a contract by uploading the signed PDF
///
/// # Responses
/// - 200 (OK): Contract signed
/// - 400 (Bad Request): Terms not accepted or the document is not a PDF
/// - 404 (Not Found): Contract not found
/// - 409 (Conflict): Contract already signed
#[utoipa::path(
    post,
    path = "/api/provider/contracts/{id}/sign",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    request_body(content = SignContractForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Contract signed", body = ContractDto),
        (status = 400, description = "Terms not accepted or invalid upload", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 409, description = "Contract already signed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn sign(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let form = UploadForm::read(multipart, DOCUMENT_FIELD).await?;
    let terms_accepted = form.flag("terms_accepted");

    let contract = ProviderContractService::new(&state.db, &state.documents)
        .sign(provider_id, id, terms_accepted, form.file)
        .await?;

    Ok(Json(contract))
}

/// Downloads the stored contract document
#[utoipa::path(
    get,
    path = "/api/provider/contracts/{id}/document",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "The contract document as an attachment"),
        (status = 404, description = "Contract or document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn document(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let document = ProviderContractService::new(&state.db, &state.documents)
        .document(provider_id, id)
        .await?;

    Ok(attachment(
        &document.file_name,
        document.content_type(),
        document.bytes,
    ))
}

/// Starts tracking the shipment of a signed contract
#[utoipa::path(
    post,
    path = "/api/provider/contracts/{id}/tracking",
    tag = PROVIDER_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 201, description = "Tracking started with status Received", body = ShipmentSnapshotDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 409, description = "Contract unsigned or already tracked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_tracking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let provider_id = provider_id(&state, &session).await?;

    let snapshot = ProviderTrackingService::new(&state.db)
        .start(provider_id, id)
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}
