//! Shared response envelope types.

use flixhub_core::pagination::PageWindow;
use serde::Serialize;

/// One page of a list endpoint: `{ items, total, limit, offset }`.
///
/// `limit` and `offset` echo the clamped values actually applied.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            items,
            total,
            limit: window.limit,
            offset: window.offset,
        }
    }
}
