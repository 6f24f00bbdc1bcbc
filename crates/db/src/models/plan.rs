//! Subscription plan model and DTOs.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `subscription_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Price per billing period in minor currency units.
    pub price_cents: i64,
    pub currency: String,
    /// One of `sd`, `hd`, `full_hd`, `ultra_hd`.
    pub video_quality: String,
    pub max_devices: i32,
    /// Length of one billing period.
    pub duration_days: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a plan.
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    /// Defaults to `USD` if omitted.
    pub currency: Option<String>,
    pub video_quality: String,
    pub max_devices: i32,
    /// Defaults to 30 if omitted.
    pub duration_days: Option<i32>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating a plan. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub video_quality: Option<String>,
    pub max_devices: Option<i32>,
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}
