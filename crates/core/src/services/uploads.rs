//! Media upload and best-effort cleanup helpers shared by services.

use vidtube_common::{
    AppResult, MediaKind, SharedMediaStorage, UploadedMedia, extract_public_id,
};

/// Raw media handed to a service by the API layer.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl MediaUpload {
    /// Store this upload under `folder`.
    pub async fn store(&self, media: &SharedMediaStorage, folder: &str) -> AppResult<UploadedMedia> {
        media.upload(&self.data, &self.content_type, folder).await
    }
}

/// Delete the media behind `url`, logging and swallowing any failure.
///
/// Only call this after the primary mutation has been committed.
pub async fn discard(media: &SharedMediaStorage, url: &str, kind: MediaKind) {
    let Some(public_id) = extract_public_id(url) else {
        tracing::warn!(url = %url, "Could not derive public id for media cleanup");
        return;
    };

    if let Err(e) = media.delete(&public_id, kind).await {
        tracing::warn!(public_id = %public_id, error = %e, "Media cleanup failed");
    }
}
