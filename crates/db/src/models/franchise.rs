//! Franchise model and DTOs.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `franchises` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Franchise {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a franchise.
#[derive(Debug, Clone)]
pub struct CreateFranchise {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a franchise. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateFranchise {
    pub name: Option<String>,
    pub description: Option<String>,
}
