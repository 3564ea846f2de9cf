//! Request and response payloads of the Wasl HTTP API.

pub mod admin;
pub mod api;
pub mod auth;
pub mod bid;
pub mod contract;
pub mod dashboard;
pub mod direct_request;
pub mod feedback;
pub mod invoice;
pub mod location;
pub mod payment;
pub mod profile;
pub mod report;
pub mod shipment;
pub mod tracking;
