//! Pagination request and response shapes.
//!
//! # Invariants
//! - `page` and `limit` are at least 1, enforced by `NonZeroU32`.
//! - `last_page` is the ceiling of `total / limit`, and 0 for an empty catalog.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: NonZeroU32,
    #[serde(default = "default_limit")]
    pub limit: NonZeroU32,
}

impl PaginationQuery {
    pub fn new(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { page, limit }
    }

    /// Builds a query from raw numbers, returning `None` when either is zero.
    pub fn from_raw(page: u32, limit: u32) -> Option<Self> {
        Some(Self::new(NonZeroU32::new(page)?, NonZeroU32::new(limit)?))
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.limit.get())
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

fn default_page() -> NonZeroU32 {
    DEFAULT_PAGE
}

fn default_limit() -> NonZeroU32 {
    DEFAULT_LIMIT
}

/// Listing metadata returned next to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Number of available products at count time.
    pub total: u64,
    pub last_page: u64,
    /// The requested page, echoed back even when past `last_page`.
    pub page: u32,
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

/// Ceiling division of `total` by `limit`.
pub fn last_page(total: u64, limit: NonZeroU32) -> u64 {
    total.div_ceil(u64::from(limit.get()))
}

#[cfg(test)]
mod tests {
    use super::{last_page, PaginationQuery};
    use std::num::NonZeroU32;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    #[test]
    fn last_page_rounds_up_and_is_zero_when_empty() {
        assert_eq!(last_page(0, nz(10)), 0);
        assert_eq!(last_page(3, nz(2)), 2);
        assert_eq!(last_page(4, nz(2)), 2);
        assert_eq!(last_page(1, nz(10)), 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PaginationQuery::new(nz(1), nz(10)).offset(), 0);
        assert_eq!(PaginationQuery::new(nz(3), nz(2)).offset(), 4);
    }

    #[test]
    fn offset_does_not_overflow_for_large_pages() {
        let query = PaginationQuery::new(nz(u32::MAX), nz(u32::MAX));
        assert_eq!(
            query.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, PaginationQuery::default());
        assert_eq!(query.limit.get(), 10);

        let zero = serde_json::from_str::<PaginationQuery>(r#"{"page":0}"#);
        assert!(zero.is_err());
    }
}
