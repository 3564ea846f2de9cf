use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        contract::ContractDto,
        payment::PaymentDto,
        profile::{CompanyDto, ProviderDto},
        shipment::ShipmentRequestDto,
    },
    server::model::db::InvoiceModel,
};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InvoiceDto {
    pub id: i32,
    pub contract_id: i32,
    pub invoice_number: String,
    pub issued_at: NaiveDateTime,
    pub due_at: NaiveDateTime,
}

impl From<InvoiceModel> for InvoiceDto {
    fn from(invoice: InvoiceModel) -> Self {
        Self {
            id: invoice.id,
            contract_id: invoice.contract_id,
            invoice_number: invoice.invoice_number,
            issued_at: invoice.issued_at,
            due_at: invoice.due_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceFilter {
    #[default]
    All,
    Paid,
    Unpaid,
    Overdue,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilterQuery {
    #[param(inline)]
    pub filter: Option<InvoiceFilter>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct InvoiceListItemDto {
    pub invoice: InvoiceDto,
    pub provider_name: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub latest_payment: Option<PaymentDto>,
    pub is_paid: bool,
    pub is_overdue: bool,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct InvoiceDetailsDto {
    pub invoice: InvoiceDto,
    pub contract: ContractDto,
    pub shipment: ShipmentRequestDto,
    pub company: CompanyDto,
    pub provider: ProviderDto,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Newest first
    pub payments: Vec<PaymentDto>,
}
