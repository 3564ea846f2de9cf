//! Service layer for business logic.
//!
//! Services validate input, enforce ownership and status rules, and coordinate
//! repositories inside transactions where a flow writes more than one row.
//! Authorization by role happens in the controllers; services receive the
//! already-resolved company, provider or admin id.

pub mod admin;
pub mod auth;
pub mod bid;
pub mod contract;
pub mod dashboard;
pub mod direct_request;
pub mod feedback;
pub mod invoice;
pub mod payment;
pub mod profile;
pub mod report;
pub mod shipment_request;
pub mod tracking;
