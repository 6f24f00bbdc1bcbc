//! Route definitions for `/subscriptions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`. All require auth.
///
/// ```text
/// POST /                -> subscribe
/// GET  /me              -> my_subscriptions
/// GET  /me/current      -> current_subscription
/// POST /{id}/cancel     -> cancel_subscription (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(subscriptions::subscribe))
        .route("/me", get(subscriptions::my_subscriptions))
        .route("/me/current", get(subscriptions::current_subscription))
        .route("/{id}/cancel", post(subscriptions::cancel_subscription))
}
