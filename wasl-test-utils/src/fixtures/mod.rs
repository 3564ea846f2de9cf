//! Database fixtures inserted during test execution.
//!
//! - `user` - login users with their admin, company or provider profiles
//! - `marketplace` - shipment requests, bids, contracts, invoices, payments,
//!   shipment snapshots and feedback

pub mod marketplace;
pub mod user;
