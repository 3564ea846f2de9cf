//! Endpoints for logged in logistics providers.

pub mod bid;
pub mod contract;
pub mod direct_request;
pub mod profile;
pub mod tracking;

pub static PROVIDER_TAG: &str = "provider";
