//! Route definitions for `/me`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`. All require auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::get_profile).put(me::update_profile))
        .route("/change-password", post(me::change_password))
}
