//! Episode model and DTOs.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `episodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub content_id: DbId,
    pub season_number: i32,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an episode.
#[derive(Debug, Clone)]
pub struct CreateEpisode {
    pub content_id: DbId,
    pub season_number: i32,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// DTO for updating an episode. All fields are optional; the parent content
/// cannot change.
#[derive(Debug, Clone, Default)]
pub struct UpdateEpisode {
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}
