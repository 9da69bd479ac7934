//! Video service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator, MediaKind, SharedMediaStorage};
use vidtube_db::{
    entities::video,
    repositories::{VideoRepository, WatchHistoryRepository},
};

use super::{MediaUpload, not_blank, uploads::discard};
use crate::guard::require_owner;

const VIDEO_FOLDER: &str = "videos";
const THUMBNAIL_FOLDER: &str = "thumbnails";

/// Video service for business logic.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    history_repo: WatchHistoryRepository,
    media: SharedMediaStorage,
    id_gen: IdGenerator,
}

/// Input for publishing a video.
#[derive(Debug, Deserialize, Validate)]
pub struct PublishVideoInput {
    #[validate(custom(function = "not_blank"), length(max = 256))]
    pub title: String,

    #[validate(custom(function = "not_blank"), length(max = 5000))]
    pub description: String,
}

/// Input for updating video details.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVideoInput {
    #[validate(custom(function = "not_blank"), length(max = 256))]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank"), length(max = 5000))]
    pub description: Option<String>,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        history_repo: WatchHistoryRepository,
        media: SharedMediaStorage,
    ) -> Self {
        Self {
            video_repo,
            history_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upload a video and its thumbnail. New videos start unpublished.
    pub async fn publish(
        &self,
        actor_id: &str,
        input: PublishVideoInput,
        video_file: Option<MediaUpload>,
        thumbnail: Option<MediaUpload>,
    ) -> AppResult<video::Model> {
        input.validate()?;

        let video_file =
            video_file.ok_or_else(|| AppError::BadRequest("Video file is required".to_string()))?;
        let thumbnail =
            thumbnail.ok_or_else(|| AppError::BadRequest("Thumbnail is required".to_string()))?;

        let stored_video = video_file.store(&self.media, VIDEO_FOLDER).await?;
        let stored_thumbnail = thumbnail.store(&self.media, THUMBNAIL_FOLDER).await?;

        let now = Utc::now();
        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            video_file_url: Set(stored_video.url),
            thumbnail_url: Set(stored_thumbnail.url),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            duration: Set(stored_video.duration.unwrap_or(0.0)),
            views: Set(0),
            is_published: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let video = self.video_repo.create(model).await?;
        tracing::info!(video_id = %video.id, owner_id = %actor_id, "Published video");
        Ok(video)
    }

    async fn find(&self, video_id: &str) -> AppResult<video::Model> {
        self.video_repo
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Fetch a video, counting the view.
    ///
    /// For an authenticated viewer the video is also pushed to the front of
    /// their watch history.
    pub async fn get_by_id(&self, video_id: &str, viewer_id: Option<&str>) -> AppResult<video::Model> {
        let mut video = self.find(video_id).await?;

        self.video_repo.increment_views(&video.id).await?;
        video.views += 1;

        if let Some(viewer_id) = viewer_id {
            self.history_repo
                .record(self.id_gen.generate(), viewer_id, &video.id)
                .await?;
        }

        Ok(video)
    }

    /// List a user's videos, newest first.
    ///
    /// Unpublished videos are only visible to their owner.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<video::Model>> {
        let published_only = viewer_id != Some(owner_id);
        self.video_repo.find_by_owner(owner_id, published_only).await
    }

    /// Update title, description and/or thumbnail.
    pub async fn update(
        &self,
        actor_id: &str,
        video_id: &str,
        input: UpdateVideoInput,
        thumbnail: Option<MediaUpload>,
    ) -> AppResult<video::Model> {
        input.validate()?;

        if input.title.is_none() && input.description.is_none() && thumbnail.is_none() {
            return Err(AppError::BadRequest(
                "At least one field is required".to_string(),
            ));
        }

        let video = self.find(video_id).await?;
        require_owner(&video, actor_id)?;

        let previous_thumbnail = video.thumbnail_url.clone();
        let mut active: video::ActiveModel = video.into();

        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description.trim().to_string());
        }

        let replaced_thumbnail = match thumbnail {
            Some(upload) => {
                let stored = upload.store(&self.media, THUMBNAIL_FOLDER).await?;
                active.thumbnail_url = Set(stored.url);
                true
            }
            None => false,
        };
        active.updated_at = Set(Utc::now().into());

        let updated = self.video_repo.update(active).await?;

        if replaced_thumbnail {
            discard(&self.media, &previous_thumbnail, MediaKind::Image).await;
        }
        Ok(updated)
    }

    /// Delete a video and its dependent rows, then its media.
    pub async fn delete(&self, actor_id: &str, video_id: &str) -> AppResult<()> {
        let video = self.find(video_id).await?;
        require_owner(&video, actor_id)?;

        if !self.video_repo.delete(&video.id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        tracing::info!(video_id = %video.id, "Deleted video");

        discard(&self.media, &video.video_file_url, MediaKind::Video).await;
        discard(&self.media, &video.thumbnail_url, MediaKind::Image).await;
        Ok(())
    }

    /// Flip the published flag.
    pub async fn toggle_publish(&self, actor_id: &str, video_id: &str) -> AppResult<video::Model> {
        let video = self.find(video_id).await?;
        require_owner(&video, actor_id)?;

        let is_published = !video.is_published;
        let mut active: video::ActiveModel = video.into();
        active.is_published = Set(is_published);
        active.updated_at = Set(Utc::now().into());

        self.video_repo.update(active).await
    }
}
