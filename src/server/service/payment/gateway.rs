//! Payment gateway seam.
//!
//! Charges are settled synchronously. [`SettlementGateway`] approves every charge and
//! issues a transaction id, other gateways can be swapped in through application state.

use rust_decimal::Decimal;

/// A charge for one payment row.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub payment_id: i32,
    pub amount: Decimal,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved { transaction_id: String },
    Declined { reason: String },
}

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, request: &ChargeRequest) -> ChargeOutcome;
}

/// Gateway approving every charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementGateway;

impl PaymentGateway for SettlementGateway {
    fn charge(&self, request: &ChargeRequest) -> ChargeOutcome {
        let transaction_id = new_transaction_id();

        tracing::debug!(
            payment_id = request.payment_id,
            amount = %request.amount,
            transaction_id = %transaction_id,
            "Settled charge"
        );

        ChargeOutcome::Approved { transaction_id }
    }
}

/// 16 uppercase hexadecimal characters
pub fn new_transaction_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();

    hex[..16].to_ascii_uppercase()
}
