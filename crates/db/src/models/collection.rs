//! Collection model and DTOs.
//!
//! Collections are curated rows on the home screen ("Trending now",
//! "Award winners"); a content item may belong to many of them.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a collection.
#[derive(Debug, Clone)]
pub struct CreateCollection {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a collection. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
}
