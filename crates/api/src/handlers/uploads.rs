//! Handlers for `/uploads`: multipart media uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::validation::FieldErrors;

use crate::error::{AppError, AppResult};
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::storage::{MediaKind, StageError, StoredMedia};
use crate::usecases::uploads::{UploadMediaRequest, UploadedFile};

fn stage_error(err: StageError) -> AppError {
    match err {
        err @ StageError::TooLarge { .. } => FieldErrors::single("file", err.to_string()).into(),
        StageError::Io(e) => AppError::InternalError(format!("Failed to stage upload: {e}")),
    }
}

/// Stream the `file` part of the form into staging, ignoring any other fields.
///
/// The size limit for `kind` is enforced chunk by chunk.
async fn stage_file_field(
    state: &AppState,
    kind: MediaKind,
    multipart: &mut Multipart,
) -> AppResult<Option<UploadedFile>> {
    let mut file = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let mut writer = state
            .storage
            .begin_stage(kind)
            .await
            .map_err(|e| stage_error(e.into()))?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            writer.write_chunk(&chunk).await.map_err(stage_error)?;
        }
        file = Some(UploadedFile {
            file_name,
            staged: writer.finish().await.map_err(stage_error)?,
        });
    }
    Ok(file)
}

async fn upload(
    state: &AppState,
    kind: MediaKind,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredMedia>)> {
    let file = stage_file_field(state, kind, &mut multipart).await?;
    let stored = mediator::send(state, UploadMediaRequest { kind, file }).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/uploads/images
///
/// Multipart form with a `file` field holding a JPEG, PNG or WebP image.
pub async fn upload_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredMedia>)> {
    upload(&state, MediaKind::Image, multipart).await
}

/// POST /api/v1/uploads/videos
///
/// Multipart form with a `file` field holding an MP4, WebM, MOV or MKV video.
pub async fn upload_video(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredMedia>)> {
    upload(&state, MediaKind::Video, multipart).await
}
