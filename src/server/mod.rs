//! Server application core modules.
//!
//! This module contains the server side of Wasl: HTTP routing, session based
//! authentication with role policies, database access through repositories, and
//! the marketplace services behind each workflow (shipment requests, bids,
//! contracts, payments, tracking and feedback).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod util;
