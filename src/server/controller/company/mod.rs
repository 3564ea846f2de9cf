//! Endpoints for logged in companies.
//!
//! Every handler resolves the caller's company profile through
//! [`company_id`](crate::server::controller::util::authorize::company_id), so
//! other roles receive 403 and anonymous callers 401.

pub mod bid;
pub mod contract;
pub mod direct_request;
pub mod invoice;
pub mod payment;
pub mod profile;
pub mod shipment;
pub mod tracking;

pub static COMPANY_TAG: &str = "company";
