//! Media storage abstraction for video files and images.
//!
//! Uploaded media is addressed by a *public id* (`folder/name`, no extension)
//! and served from a versioned URL of the form
//! `{base_url}/v{version}/{public_id}.{ext}`. The public id can always be
//! recovered from the URL with [`extract_public_id`], which is how stored
//! records request upstream deletion.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{AppError, AppResult, IdGenerator};

static VERSION_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^v\d+$").unwrap()
});

/// Kind of media resource, used when requesting deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image (avatar, cover image, thumbnail).
    Image,
    /// Video file.
    Video,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Public URL of the stored file.
    pub url: String,
    /// Identifier used for deletion.
    pub public_id: String,
    /// Duration in seconds, when the backend can determine it.
    pub duration: Option<f64>,
}

/// Media storage backend.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `data` under `folder` and return its public location.
    async fn upload(&self, data: &[u8], content_type: &str, folder: &str)
    -> AppResult<UploadedMedia>;

    /// Delete the media identified by `public_id`.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> AppResult<()>;
}

/// Shared media storage handle.
pub type SharedMediaStorage = Arc<dyn MediaStorage>;

/// Derive the public id from a media URL.
///
/// Everything after the `v<digits>` version segment is the public id, minus
/// the file name's extension. Returns `None` for URLs that cannot be parsed.
#[must_use]
pub fn extract_public_id(media_url: &str) -> Option<String> {
    let parsed = Url::parse(media_url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    let start = segments
        .iter()
        .position(|s| VERSION_SEGMENT.is_match(s))
        .map_or(0, |i| i + 1);
    let (file, folders) = segments.get(start..)?.split_last()?;

    let stem = file.rsplit_once('.').map_or(*file, |(stem, _)| stem);
    if stem.is_empty() {
        return None;
    }

    let mut parts = folders.to_vec();
    parts.push(stem);
    Some(parts.join("/"))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// Local filesystem media storage.
pub struct LocalMediaStorage {
    base_path: PathBuf,
    base_url: String,
    id_gen: IdGenerator,
}

impl LocalMediaStorage {
    /// Create a new local media storage.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
            id_gen: IdGenerator::new(),
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(
        &self,
        data: &[u8],
        content_type: &str,
        folder: &str,
    ) -> AppResult<UploadedMedia> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let folder = folder.trim_matches('/');
        let public_id = format!("{folder}/{}", self.id_gen.generate());
        let ext = extension_for(content_type);
        let path = self.base_path.join(format!("{public_id}.{ext}"));

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::ExternalService(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to write file: {e}")))?;

        let version = chrono::Utc::now().timestamp();
        let url = format!(
            "{}/v{version}/{public_id}.{ext}",
            self.base_url.trim_end_matches('/')
        );

        tracing::debug!(public_id = %public_id, size = data.len(), "Stored media");

        Ok(UploadedMedia {
            url,
            public_id,
            duration: None,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> AppResult<()> {
        let target = self.base_path.join(public_id);
        let (Some(dir), Some(stem)) = (target.parent(), target.file_name()) else {
            return Err(AppError::BadRequest(format!("Invalid public id: {public_id}")));
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(AppError::ExternalService(format!(
                    "Failed to read media directory: {e}"
                )));
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to read media directory: {e}")))?
        {
            let path = entry.path();
            if path.file_stem() == Some(stem) {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| AppError::ExternalService(format!("Failed to delete file: {e}")))?;
            }
        }

        Ok(())
    }
}

/// Media storage that accepts nothing and deletes nothing.
///
/// Used when no media backend is configured and in tests.
#[derive(Debug, Default, Clone)]
pub struct NoOpMediaStorage;

#[async_trait::async_trait]
impl MediaStorage for NoOpMediaStorage {
    async fn upload(
        &self,
        _data: &[u8],
        _content_type: &str,
        _folder: &str,
    ) -> AppResult<UploadedMedia> {
        Err(AppError::ExternalService(
            "Media storage is not configured".to_string(),
        ))
    }

    async fn delete(&self, _public_id: &str, _kind: MediaKind) -> AppResult<()> {
        Ok(())
    }
}
