//! Local file storage for uploaded posters, thumbnails and videos.
//!
//! Uploads are streamed into `{root}/.staging/` while the size limit is
//! enforced, then moved under `{root}/images/` or `{root}/videos/` with a
//! random UUID name and served back under the public media base URL.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::env_or;

const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_VIDEO_BYTES: usize = 2 * 1024 * 1024 * 1024;
const STAGING_DIR: &str = ".staging";

/// Where uploads are written and how large they may be.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// Prefix of public URLs (`/media` or an absolute CDN URL).
    pub public_base_url: String,
    pub max_image_bytes: usize,
    pub max_video_bytes: usize,
}

impl StorageConfig {
    /// Load storage settings.
    ///
    /// | Variable                  | Default    |
    /// |---------------------------|------------|
    /// | `STORAGE_ROOT`            | `storage`  |
    /// | `MEDIA_BASE_URL`          | `/media`   |
    /// | `MAX_IMAGE_UPLOAD_BYTES`  | 10 MiB     |
    /// | `MAX_VIDEO_UPLOAD_BYTES`  | 2 GiB      |
    pub fn from_env() -> Self {
        Self {
            root: PathBuf::from(std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into())),
            public_base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "/media".into())
                .trim_end_matches('/')
                .to_string(),
            max_image_bytes: env_or("MAX_IMAGE_UPLOAD_BYTES", DEFAULT_MAX_IMAGE_BYTES),
            max_video_bytes: env_or("MAX_VIDEO_UPLOAD_BYTES", DEFAULT_MAX_VIDEO_BYTES),
        }
    }

    /// Path the media directory is mounted at when served by this process.
    ///
    /// `None` when the base URL points elsewhere (e.g. a CDN).
    pub fn local_mount(&self) -> Option<&str> {
        self.public_base_url
            .starts_with('/')
            .then_some(self.public_base_url.as_str())
            .filter(|p| p.len() > 1)
    }
}

/// The two upload families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn dir(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["jpg", "jpeg", "png", "webp"],
            MediaKind::Video => &["mp4", "webm", "mov", "mkv"],
        }
    }

    pub fn max_bytes(self, config: &StorageConfig) -> usize {
        match self {
            MediaKind::Image => config.max_image_bytes,
            MediaKind::Video => config.max_video_bytes,
        }
    }
}

/// MIME type reported for an accepted extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Lower-cased extension of a client-supplied file name.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty())
}

/// Read width and height from an image header without decoding pixels.
///
/// Blocking; call from `spawn_blocking`.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("File exceeds the {max} byte limit")]
    TooLarge { max: usize },

    #[error("Staging I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An upload sitting in the staging directory.
///
/// The file is deleted when this value is dropped, unless
/// [`MediaStorage::persist`] has already moved it.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    size: usize,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Discarded staged upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staged upload"
            ),
        }
    }
}

/// Streams chunks into a staged file, refusing to grow past `max` bytes.
#[derive(Debug)]
pub struct StagingWriter {
    file: tokio::fs::File,
    staged: StagedFile,
    max: usize,
}

impl StagingWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StageError> {
        let size = self.staged.size + chunk.len();
        if size > self.max {
            return Err(StageError::TooLarge { max: self.max });
        }
        self.file.write_all(chunk).await?;
        self.staged.size = size;
        Ok(())
    }

    pub async fn finish(self) -> Result<StagedFile, StageError> {
        let StagingWriter { mut file, staged, .. } = self;
        file.flush().await?;
        Ok(staged)
    }
}

/// Metadata returned after a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub file_name: String,
    pub size_bytes: usize,
    pub content_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Writes uploads to disk.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    config: StorageConfig,
}

impl MediaStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Create the root, staging and per-kind directories if missing.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.config.root.join(STAGING_DIR)).await?;
        for kind in [MediaKind::Image, MediaKind::Video] {
            tokio::fs::create_dir_all(self.config.root.join(kind.dir())).await?;
        }
        Ok(())
    }

    /// Open a new staged file that accepts at most `kind`'s size limit.
    pub async fn begin_stage(&self, kind: MediaKind) -> std::io::Result<StagingWriter> {
        let dir = self.config.root.join(STAGING_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}.part", Uuid::new_v4()));
        let file = tokio::fs::File::create(&path).await?;
        Ok(StagingWriter {
            file,
            staged: StagedFile { path, size: 0 },
            max: kind.max_bytes(&self.config),
        })
    }

    /// Move a staged upload under a fresh name and return its public location.
    pub async fn persist(
        &self,
        kind: MediaKind,
        ext: &str,
        staged: StagedFile,
        dimensions: Option<(u32, u32)>,
    ) -> std::io::Result<StoredMedia> {
        let dir = self.config.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::rename(staged.path(), dir.join(&file_name)).await?;

        tracing::info!(kind = kind.dir(), %file_name, size = staged.size(), "Stored upload");

        Ok(StoredMedia {
            url: format!("{}/{}/{file_name}", self.config.public_base_url, kind.dir()),
            file_name,
            size_bytes: staged.size(),
            content_type: content_type_for(ext),
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 transparent PNG.
    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn config(root: PathBuf) -> StorageConfig {
        StorageConfig {
            root,
            public_base_url: "/media".into(),
            max_image_bytes: 1024,
            max_video_bytes: 4096,
        }
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Poster.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("README"), None);
    }


    #[test]
    fn local_mount_only_for_paths() {
        let mut cfg = config(PathBuf::from("storage"));
        assert_eq!(cfg.local_mount(), Some("/media"));
        cfg.public_base_url = "https://cdn.example.com/media".into();
        assert_eq!(cfg.local_mount(), None);
    }

    fn temp_storage() -> (MediaStorage, PathBuf) {
        let root = std::env::temp_dir().join(format!("flixhub-storage-{}", Uuid::new_v4()));
        (MediaStorage::new(config(root.clone())), root)
    }

    async fn stage(storage: &MediaStorage, kind: MediaKind, chunks: &[&[u8]]) -> StagedFile {
        let mut writer = storage.begin_stage(kind).await.unwrap();
        for chunk in chunks {
            writer.write_chunk(chunk).await.unwrap();
        }
        writer.finish().await.unwrap()
    }

    #[tokio::test]
    async fn dimensions_come_from_png_header() {
        let (storage, root) = temp_storage();
        let png = stage(&storage, MediaKind::Image, &[PNG_1X1]).await;
        assert_eq!(read_dimensions(png.path()).unwrap(), (1, 1));

        let junk = stage(&storage, MediaKind::Image, &[&b"definitely not an image"[..]]).await;
        assert!(read_dimensions(junk.path()).is_err());

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn staging_stops_at_the_size_limit() {
        let (storage, root) = temp_storage();
        let mut writer = storage.begin_stage(MediaKind::Image).await.unwrap();
        writer.write_chunk(&[0u8; 1000]).await.unwrap();
        let err = writer.write_chunk(&[0u8; 100]).await.unwrap_err();
        assert!(matches!(err, StageError::TooLarge { max: 1024 }));
        assert_eq!(err.to_string(), "File exceeds the 1024 byte limit");

        drop(writer);
        let mut leftovers = tokio::fs::read_dir(root.join(STAGING_DIR)).await.unwrap();
        assert!(leftovers.next_entry().await.unwrap().is_none());

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn persist_moves_file_and_builds_url() {
        let (storage, root) = temp_storage();
        let staged = stage(&storage, MediaKind::Image, &[&PNG_1X1[..8], &PNG_1X1[8..]]).await;
        let staged_path = staged.path().to_path_buf();

        let stored = storage
            .persist(MediaKind::Image, "png", staged, Some((1, 1)))
            .await
            .unwrap();

        assert!(stored.url.starts_with("/media/images/"));
        assert!(stored.url.ends_with(".png"));
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(stored.width, Some(1));
        let on_disk = tokio::fs::read(root.join("images").join(&stored.file_name))
            .await
            .unwrap();
        assert_eq!(on_disk, PNG_1X1);
        assert_eq!(stored.size_bytes, PNG_1X1.len());
        assert!(!staged_path.exists());

        let _ = tokio::fs::remove_dir_all(root).await;
    }
}
