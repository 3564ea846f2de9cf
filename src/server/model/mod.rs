//! Server application models and type definitions.
//!
//! Application state shared by handlers, authorization policies, database model
//! aliases and typed session entries.

pub mod app;
pub mod auth;
pub mod db;
pub mod session;
