//! Database model type aliases.
//!
//! Short names for the SeaORM models generated in the `entity` crate.

/// Login account shared by every role.
pub type UserModel = entity::wasl_user::Model;

pub type AdminModel = entity::admin::Model;

/// Shipping company profile. `is_approved` gates login.
pub type CompanyModel = entity::company::Model;

/// Logistics provider profile. `is_approved` gates login and the directory listing.
pub type ProviderModel = entity::provider::Model;

pub type ShipmentRequestModel = entity::shipment_request::Model;

/// Provider offer on a shipment request, also used for direct requests.
pub type BidModel = entity::bid::Model;

pub type ContractModel = entity::contract::Model;

pub type InvoiceModel = entity::invoice::Model;

pub type PaymentModel = entity::payment::Model;

/// One append-only tracking snapshot.
pub type ShipmentModel = entity::shipment::Model;

pub type FeedbackModel = entity::feedback::Model;

pub type RevenueReportModel = entity::revenue_report::Model;
