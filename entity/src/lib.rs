//! SeaORM entities for the Wasl marketplace schema.

pub mod prelude;

pub mod admin;
pub mod bid;
pub mod company;
pub mod contract;
pub mod feedback;
pub mod invoice;
pub mod payment;
pub mod provider;
pub mod revenue_report;
pub mod shipment;
pub mod shipment_request;
pub mod status;
pub mod wasl_user;
