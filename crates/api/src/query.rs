//! Query-string parameter types shared by list handlers.
//!
//! `serde(flatten)` does not play well with numeric fields under
//! `serde_urlencoded`, so each list endpoint spells out its own parameters
//! and repeats `limit` / `offset`.

use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use serde::Deserialize;

/// `?limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.limit, self.offset)
    }
}

/// `?search=&limit=&offset=` for name-searchable lists.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.limit, self.offset)
    }

    /// The search term, trimmed, or `None` when blank.
    pub fn term(&self) -> Option<String> {
        non_blank(self.search.as_deref())
    }
}

/// `?include_inactive=&limit=&offset=` for subscription plans.
#[derive(Debug, Default, Deserialize)]
pub struct PlanListParams {
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Filters for the admin subscription listing.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionListParams {
    pub user_id: Option<DbId>,
    #[serde(default)]
    pub active_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Catalog filters for `GET /contents`.
#[derive(Debug, Default, Deserialize)]
pub struct ContentListParams {
    pub search: Option<String>,
    pub content_type: Option<String>,
    pub genre_id: Option<DbId>,
    pub collection_id: Option<DbId>,
    pub franchise_id: Option<DbId>,
    pub release_year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Trim a free-text filter, treating blank input as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        let params = SearchParams {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(params.term(), None);

        let params = SearchParams {
            search: Some(" noir ".into()),
            ..Default::default()
        };
        assert_eq!(params.term().as_deref(), Some("noir"));
    }

    #[test]
    fn window_clamps() {
        let params = PaginationParams {
            limit: Some(500),
            offset: Some(-2),
        };
        let window = params.window();
        assert_eq!((window.limit, window.offset), (100, 0));
    }
}
