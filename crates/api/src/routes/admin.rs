//! Route definitions for `/admin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{subscriptions, users};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET, POST          /users                -> list_users, create_user
/// GET, PUT, DELETE   /users/{id}           -> get_user, update_user, delete_user
/// GET                /subscriptions        -> list_subscriptions
/// GET, DELETE        /subscriptions/{id}   -> get_subscription, delete_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get_subscription).delete(subscriptions::delete_subscription),
        )
}
