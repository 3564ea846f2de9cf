//! Utility functions and helpers for server operations.
//!
//! Date arithmetic for reports and reference numbers, document storage on disk,
//! password hashing, the Saudi region and city catalogue, and payload validation.

pub mod location;
pub mod password;
pub mod storage;
pub mod time;
pub mod validation;
