use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        bid::BidDto,
        invoice::InvoiceDto,
        payment::PaymentDto,
        profile::{CompanyDto, ProviderDto},
        shipment::ShipmentRequestDto,
        tracking::ShipmentSnapshotDto,
    },
    server::{model::db::ContractModel, util::storage},
};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContractDto {
    pub id: i32,
    pub bid_id: i32,
    pub company_id: i32,
    pub provider_id: i32,
    pub shipment_request_id: i32,
    /// File name of the stored document
    pub document: String,
    pub signed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<ContractModel> for ContractDto {
    fn from(contract: ContractModel) -> Self {
        Self {
            id: contract.id,
            bid_id: contract.bid_id,
            company_id: contract.company_id,
            provider_id: contract.provider_id,
            shipment_request_id: contract.shipment_request_id,
            document: storage::file_name(&contract.document).to_string(),
            signed_at: contract.signed_at,
            created_at: contract.created_at,
        }
    }
}

/// A contract with the names and price needed for listings
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContractSummaryDto {
    pub contract: ContractDto,
    pub shipment: ShipmentRequestDto,
    pub company_name: String,
    pub provider_name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContractDetailsDto {
    pub contract: ContractDto,
    pub bid: BidDto,
    pub shipment: ShipmentRequestDto,
    pub company: CompanyDto,
    pub provider: ProviderDto,
    pub invoice: Option<InvoiceDto>,
    pub latest_payment: Option<PaymentDto>,
    pub latest_snapshot: Option<ShipmentSnapshotDto>,
}

/// Sign date filter for the provider's contract listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContractFilter {
    #[default]
    All,
    Signed,
    Pending,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContractFilterQuery {
    #[param(inline)]
    pub filter: Option<ContractFilter>,
}
