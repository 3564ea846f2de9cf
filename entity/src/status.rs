//! String-backed status enums shared by the marketplace tables.
//!
//! Each variant is persisted as its PascalCase name so rows stay readable from
//! plain SQL and match the values exchanged over the API.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "Company")]
    Company,
    #[sea_orm(string_value = "Provider")]
    Provider,
}

/// Approval state of a company or provider account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountStatus {
    #[sea_orm(string_value = "PendingApproval")]
    PendingApproval,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Suspended")]
    Suspended,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AdminStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    #[sea_orm(string_value = "Suspended")]
    Suspended,
}

/// Lifecycle of a shipment request posted by a company.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ShipmentRequestStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Bidding")]
    Bidding,
    #[sea_orm(string_value = "Assigned")]
    Assigned,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "InProgress")]
    InProgress,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
    #[sea_orm(string_value = "Failed")]
    Failed,
    /// Hidden from open bidding while a provider reviews a direct request.
    #[sea_orm(string_value = "DirectRequest")]
    DirectRequest,
}

impl ShipmentRequestStatus {
    /// Whether providers may still place open bids on the request.
    pub fn is_open_for_bids(self) -> bool {
        matches!(self, Self::Pending | Self::Bidding)
    }

    /// Whether the owning company may still edit or delete the request.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Pending | Self::Bidding)
    }

    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Bidding | Self::Assigned)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BidStatus {
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    /// A direct request awaiting the provider's offer or the company's decision.
    #[sea_orm(string_value = "UnderReview")]
    UnderReview,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
    #[sea_orm(string_value = "ContractCreated")]
    ContractCreated,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Successful")]
    Successful,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[sea_orm(string_value = "Refunded")]
    Refunded,
}

/// Status carried by each append-only shipment snapshot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TrackingStatus {
    #[sea_orm(string_value = "Received")]
    Received,
    #[sea_orm(string_value = "InTransit")]
    InTransit,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_status_orders_forward() {
        assert!(TrackingStatus::Received < TrackingStatus::InTransit);
        assert!(TrackingStatus::InTransit < TrackingStatus::Delivered);
    }

    #[test]
    fn shipment_request_status_rules() {
        assert!(ShipmentRequestStatus::Bidding.is_open_for_bids());
        assert!(!ShipmentRequestStatus::DirectRequest.is_open_for_bids());
        assert!(ShipmentRequestStatus::Assigned.is_cancellable());
        assert!(!ShipmentRequestStatus::Assigned.is_editable());
        assert!(!ShipmentRequestStatus::InProgress.is_cancellable());
    }
}
