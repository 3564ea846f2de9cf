use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        contract::{ContractDetailsDto, ContractDto, ContractSummaryDto},
        payment::{PayContractDto, PaymentDto},
    },
    server::{
        controller::{
            company::COMPANY_TAG,
            util::{
                authorize::company_id,
                upload::{attachment, UploadForm, DOCUMENT_FIELD},
            },
        },
        error::Error,
        model::app::AppState,
        service::{contract::company::CompanyContractService, payment::PaymentService},
    },
};

/// Multipart form for creating a contract
#[derive(utoipa::ToSchema)]
pub struct ContractUploadForm {
    pub bid_id: i32,
    /// `.pdf`, `.doc` or `.docx`
    #[schema(value_type = String, format = Binary)]
    pub document: Vec<u8>,
}

/// Creates a contract for an accepted bid from an uploaded document
///
/// # Responses
/// - 201 (Created): Contract created and the bid marked ContractCreated
/// - 400 (Bad Request): Missing or unsupported document
/// - 404 (Not Found): Bid not found on the company's requests
/// - 409 (Conflict): Bid is not Accepted
#[utoipa::path(
    post,
    path = "/api/company/contracts",
    tag = COMPANY_TAG,
    request_body(content = ContractUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Contract created", body = ContractDto),
        (status = 400, description = "Invalid upload", body = ErrorDto),
        (status = 404, description = "Bid not found", body = ErrorDto),
        (status = 409, description = "Bid is not Accepted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let form = UploadForm::read(multipart, DOCUMENT_FIELD).await?;
    let bid_id = form.required_id("bid_id")?;

    let contract = CompanyContractService::new(&state.db, &state.documents)
        .create(company_id, bid_id, form.file)
        .await?;

    Ok((StatusCode::CREATED, Json(contract)))
}

/// Lists the company's paid contracts
#[utoipa::path(
    get,
    path = "/api/company/contracts",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "Contracts with a successful payment", body = Vec<ContractSummaryDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not a company", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let contracts = CompanyContractService::new(&state.db, &state.documents)
        .list(company_id)
        .await?;

    Ok(Json(contracts))
}

/// Lists the company's contracts still awaiting payment
#[utoipa::path(
    get,
    path = "/api/company/contracts/waiting-payment",
    tag = COMPANY_TAG,
    responses(
        (status = 200, description = "Contracts without a successful payment", body = Vec<ContractSummaryDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn waiting_payment(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let contracts = CompanyContractService::new(&state.db, &state.documents)
        .waiting_payment(company_id)
        .await?;

    Ok(Json(contracts))
}

#[utoipa::path(
    get,
    path = "/api/company/contracts/{id}",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract with bid, invoice and latest payment", body = ContractDetailsDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let contract = CompanyContractService::new(&state.db, &state.documents)
        .show(company_id, id)
        .await?;

    Ok(Json(contract))
}

/// Downloads the stored contract document
#[utoipa::path(
    get,
    path = "/api/company/contracts/{id}/document",
    tag = COMPANY_TAG,
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
    let company_id = company_id(&state, &session).await?;

    let document = CompanyContractService::new(&state.db, &state.documents)
        .document(company_id, id)
        .await?;

    Ok(attachment(
        &document.file_name,
        document.content_type(),
        document.bytes,
    ))
}

/// Pays for a contract by card
///
/// Issues the invoice on the first attempt. Card details are only validated.
///
/// # Responses
/// - 200 (OK): Payment successful
/// - 400 (Bad Request): Invalid card details
/// - 402 (Payment Required): The charge was declined, the payment is recorded as Failed
/// - 409 (Conflict): The contract is already paid
#[utoipa::path(
    post,
    path = "/api/company/contracts/{id}/pay",
    tag = COMPANY_TAG,
    params(("id" = i32, Path, description = "Contract ID")),
    request_body = PayContractDto,
    responses(
        (status = 200, description = "Payment successful", body = PaymentDto),
        (status = 400, description = "Invalid card details", body = ErrorDto),
        (status = 402, description = "Payment declined", body = ErrorDto),
        (status = 404, description = "Contract not found", body = ErrorDto),
        (status = 409, description = "Contract already paid", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<PayContractDto>,
) -> Result<impl IntoResponse, Error> {
    let company_id = company_id(&state, &session).await?;

    let payment = PaymentService::new(&state.db, state.gateway.as_ref())
        .pay_contract(company_id, id, payload)
        .await?;

    Ok(Json(payment))
}
