//! Typed session entries.
//!
//! Each submodule wraps one key of the Valkey backed session with methods to
//! insert and read it.

pub mod role;
pub mod user;
