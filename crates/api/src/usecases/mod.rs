//! Use cases, one module per resource.
//!
//! Each operation is a request struct implementing
//! [`Request`](crate::mediator::Request). HTTP handlers deserialize the
//! body into the request (filling path ids and the caller from extractors)
//! and dispatch it with [`mediator::send`](crate::mediator::send).

use flixhub_core::error::CoreError;
use flixhub_core::types::DbId;

use crate::error::AppError;

pub mod auth;
pub mod collections;
pub mod contents;
pub mod episodes;
pub mod franchises;
pub mod genres;
pub mod me;
pub mod plans;
pub mod subscriptions;
pub mod uploads;
pub mod users;

pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Ids from `requested` that are absent from `existing`, deduplicated and sorted.
pub(crate) fn missing_ids(requested: &[DbId], existing: &[DbId]) -> Vec<DbId> {
    let mut missing: Vec<DbId> = requested
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing
}

/// `"3, 7"` style rendering for error messages.
pub(crate) fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(DbId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
