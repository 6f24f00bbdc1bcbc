//! Poster, thumbnail and video uploads.

use async_trait::async_trait;
use flixhub_core::validation::FieldErrors;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::state::AppState;
use crate::storage::{extension_of, read_dimensions, MediaKind, StagedFile, StoredMedia};

/// The `file` part of a multipart upload, already streamed to staging.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub staged: StagedFile,
}

#[derive(Validate)]
pub struct UploadMediaRequest {
    pub kind: MediaKind,
    /// `None` when the form had no `file` field.
    pub file: Option<UploadedFile>,
}

impl UploadMediaRequest {
    fn extension(&self) -> Option<String> {
        self.file
            .as_ref()
            .and_then(|f| f.file_name.as_deref())
            .and_then(extension_of)
    }
}

#[async_trait]
impl Request for UploadMediaRequest {
    type Response = StoredMedia;

    fn validate_fields(&self) -> Result<(), FieldErrors> {
        let Some(file) = &self.file else {
            return Err(FieldErrors::single("file", "A file is required"));
        };

        let mut errors = FieldErrors::new();
        if file.staged.size() == 0 {
            errors.add("file", "File is empty");
        }
        let allowed = self.kind.allowed_extensions();
        match self.extension() {
            Some(ext) if allowed.contains(&ext.as_str()) => {}
            _ => errors.add(
                "file",
                format!("Unsupported file type; expected one of: {}", allowed.join(", ")),
            ),
        }
        errors.into_result()
    }

    async fn handle(self, state: &AppState) -> AppResult<StoredMedia> {
        let ext = self.extension().unwrap_or_default();
        let Some(file) = self.file else {
            return Err(FieldErrors::single("file", "A file is required").into());
        };

        let dimensions = match self.kind {
            MediaKind::Image => {
                let path = file.staged.path().to_path_buf();
                let read = tokio::task::spawn_blocking(move || read_dimensions(&path))
                    .await
                    .map_err(|e| AppError::InternalError(format!("Image header read failed: {e}")))?;
                let dims = read
                    .map_err(|_| FieldErrors::single("file", "File is not a readable image"))?;
                Some(dims)
            }
            MediaKind::Video => None,
        };

        state
            .storage
            .persist(self.kind, &ext, file.staged, dimensions)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))
    }
}
