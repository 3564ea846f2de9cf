use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Marketplace record kinds named in not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Company,
    Provider,
    ShipmentRequest,
    Bid,
    DirectRequest,
    Contract,
    Invoice,
    Payment,
    Shipment,
    Feedback,
    Document,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Company => "Company",
            Self::Provider => "Provider",
            Self::ShipmentRequest => "Shipment request",
            Self::Bid => "Bid",
            Self::DirectRequest => "Direct request",
            Self::Contract => "Contract",
            Self::Invoice => "Invoice",
            Self::Payment => "Payment",
            Self::Shipment => "Shipment",
            Self::Feedback => "Feedback",
            Self::Document => "Document",
        };

        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum MarketplaceError {
    /// The record is missing or belongs to another account.
    #[error("{resource} {id:?} not found")]
    NotFound { resource: Resource, id: i32 },
    /// The record exists but its current state forbids the operation.
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("Payment {payment_id:?} was declined: {reason}")]
    PaymentDeclined { payment_id: i32, reason: String },
}

impl MarketplaceError {
    pub fn not_found(resource: Resource, id: i32) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotFound { resource, .. } => {
                error_response(StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            Self::InvalidState(message) | Self::Duplicate(message) => {
                error_response(StatusCode::CONFLICT, message)
            }
            Self::PaymentDeclined { reason, .. } => error_response(
                StatusCode::PAYMENT_REQUIRED,
                format!("Payment was declined: {}", reason),
            ),
        }
    }
}
