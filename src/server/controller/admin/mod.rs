//! Endpoints for platform administrators.

pub mod account;
pub mod marketplace;
pub mod profile;
pub mod report;

pub static ADMIN_TAG: &str = "admin";
