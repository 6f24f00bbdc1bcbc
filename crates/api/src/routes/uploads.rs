//! Route definitions for `/uploads`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;
use crate::storage::StorageConfig;

/// Headroom for multipart boundaries and part headers on top of the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Routes mounted at `/uploads`. Admin only.
///
/// Each route raises axum's default body limit to its media limit; the
/// handler enforces the exact file size while streaming to disk.
pub fn router(storage: &StorageConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/images",
            post(uploads::upload_image)
                .layer(DefaultBodyLimit::max(storage.max_image_bytes + MULTIPART_OVERHEAD)),
        )
        .route(
            "/videos",
            post(uploads::upload_video)
                .layer(DefaultBodyLimit::max(storage.max_video_bytes + MULTIPART_OVERHEAD)),
        )
}
