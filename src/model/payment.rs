use chrono::NaiveDateTime;
use entity::status::PaymentStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        contract::ContractDto, invoice::InvoiceDto, profile::ProviderDto,
        shipment::ShipmentRequestDto,
    },
    server::model::db::PaymentModel,
};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub invoice_id: i32,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub method: String,
    #[schema(value_type = String)]
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_date: NaiveDateTime,
}

impl From<PaymentModel> for PaymentDto {
    fn from(payment: PaymentModel) -> Self {
        Self {
            id: payment.id,
            invoice_id: payment.invoice_id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
            transaction_id: payment.transaction_id,
            payment_date: payment.payment_date,
        }
    }
}

/// Card details checked before charging. They are never persisted.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CardDetailsDto {
    /// 16 digits, spaces and dashes are ignored
    pub card_number: String,
    /// `MM/YY`
    pub expiry: String,
    pub cvv: String,
    pub holder_name: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PayContractDto {
    /// Defaults to `credit_card`
    pub method: Option<String>,
    pub card: CardDetailsDto,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentListItemDto {
    pub payment: PaymentDto,
    pub invoice_number: String,
    pub contract_id: i32,
    pub provider_name: String,
}

/// A payment with the invoice, contract, request and provider it settles
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentDetailsDto {
    pub payment: PaymentDto,
    pub invoice: InvoiceDto,
    pub contract: ContractDto,
    pub shipment: ShipmentRequestDto,
    pub provider: ProviderDto,
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentStatusQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<PaymentStatus>,
}
