//! HTTP controller endpoints for the Wasl web API.
//!
//! Axum handlers grouped by caller: public endpoints (auth, locations, open
//! shipment requests), then one module per role. Handlers check the session
//! against the role policy, call a service and return JSON. Every handler is
//! annotated for the OpenAPI document served by the router.

pub mod admin;
pub mod auth;
pub mod company;
pub mod location;
pub mod provider;
pub mod shipment;
pub mod util;
