//! Data access layer repositories.
//!
//! One repository per table. Each is generic over [`sea_orm::ConnectionTrait`] so the
//! same queries run on a plain connection or inside a transaction.

pub mod admin;
pub mod bid;
pub mod company;
pub mod contract;
pub mod feedback;
pub mod invoice;
pub mod payment;
pub mod provider;
pub mod revenue_report;
pub mod shipment;
pub mod shipment_request;
pub mod user;

use std::collections::HashMap;

/// Turn `(id, count)` rows from a grouped count into a lookup map.
pub(crate) fn count_map(rows: Vec<(i32, i64)>) -> HashMap<i32, u64> {
    rows.into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect()
}

/// Zero-based page index for a 1-based `page`.
///
/// Pages past the end collapse onto the first empty page after the last one so the
/// offset never overflows.
pub(crate) fn page_index(page: u64, total_pages: u64) -> u64 {
    page.clamp(1, total_pages.saturating_add(1)) - 1
}

#[cfg(test)]
mod tests {
    use super::page_index;

    #[test]
    fn page_index_is_zero_based() {
        assert_eq!(page_index(0, 3), 0);
        assert_eq!(page_index(1, 3), 0);
        assert_eq!(page_index(3, 3), 2);
    }

    #[test]
    fn page_index_stops_after_last_page() {
        assert_eq!(page_index(u64::MAX, 3), 3);
        assert_eq!(page_index(u64::MAX, 0), 0);
    }
}
