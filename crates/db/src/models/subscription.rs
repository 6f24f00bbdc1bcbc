//! User subscription model and DTOs.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSubscription {
    pub id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A subscription joined with the plan fields shown to subscribers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionDetails {
    pub id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub plan_name: String,
    pub video_quality: String,
    pub max_devices: i32,
    pub price_cents: i64,
    pub currency: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for starting a subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub user_id: DbId,
    pub plan_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Filter for the admin subscription listing.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub user_id: Option<DbId>,
    pub active_only: bool,
}
