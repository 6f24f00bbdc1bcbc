//! Route definitions for the catalog: genres, franchises, collections,
//! contents and episodes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{collections, contents, episodes, franchises, genres};
use crate::state::AppState;

/// Routes mounted at `/genres`.
pub fn genres() -> Router<AppState> {
    Router::new()
        .route("/", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/{id}",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
}

/// Routes mounted at `/franchises`.
pub fn franchises() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(franchises::list_franchises).post(franchises::create_franchise),
        )
        .route(
            "/{id}",
            get(franchises::get_franchise)
                .put(franchises::update_franchise)
                .delete(franchises::delete_franchise),
        )
}

/// Routes mounted at `/collections`.
pub fn collections() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/{id}",
            get(collections::get_collection)
                .put(collections::update_collection)
                .delete(collections::delete_collection),
        )
}

/// Routes mounted at `/contents`.
pub fn contents() -> Router<AppState> {
    Router::new()
        .route("/", get(contents::list_contents).post(contents::create_content))
        .route(
            "/{id}",
            get(contents::get_content)
                .put(contents::update_content)
                .delete(contents::delete_content),
        )
        .route("/{id}/episodes", get(contents::list_content_episodes))
}

/// Routes mounted at `/episodes`.
pub fn episodes() -> Router<AppState> {
    Router::new()
        .route("/", post(episodes::create_episode))
        .route(
            "/{id}",
            get(episodes::get_episode)
                .put(episodes::update_episode)
                .delete(episodes::delete_episode),
        )
}
