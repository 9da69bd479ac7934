//! Playlist service.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::playlist,
    read_model::{PlaylistWithVideos, ReadModel},
    repositories::{PlaylistRepository, VideoRepository},
};

use super::not_blank;
use crate::guard::require_owner;

/// Playlist service for business logic.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    read_model: ReadModel,
    id_gen: IdGenerator,
}

/// Input for creating a playlist.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistInput {
    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub name: String,

    #[validate(custom(function = "not_blank"), length(max = 2000))]
    pub description: String,
}

/// Input for updating a playlist.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlaylistInput {
    #[validate(custom(function = "not_blank"), length(max = 128))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank"), length(max = 2000))]
    pub description: Option<String>,
}

/// Outcome of a playlist membership change. Repeating an add or a remove
/// is reported, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipChange {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

impl MembershipChange {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Video added to playlist",
            Self::AlreadyPresent => "Video is already in the playlist",
            Self::Removed => "Video removed from playlist",
            Self::NotPresent => "Video is not in the playlist",
        }
    }
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub const fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        read_model: ReadModel,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            read_model,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn create(
        &self,
        actor_id: &str,
        input: CreatePlaylistInput,
    ) -> AppResult<playlist::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.playlist_repo.create(model).await
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<playlist::Model>> {
        self.playlist_repo.find_by_owner(owner_id).await
    }

    /// A playlist with its videos in the order they were added.
    pub async fn get_with_videos(&self, playlist_id: &str) -> AppResult<PlaylistWithVideos> {
        self.read_model
            .playlist_with_videos(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
    }

    async fn find_owned(&self, actor_id: &str, playlist_id: &str) -> AppResult<playlist::Model> {
        let playlist = self
            .playlist_repo
            .find_by_id(playlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
        require_owner(&playlist, actor_id)?;
        Ok(playlist)
    }

    pub async fn update(
        &self,
        actor_id: &str,
        playlist_id: &str,
        input: UpdatePlaylistInput,
    ) -> AppResult<playlist::Model> {
        input.validate()?;

        if input.name.is_none() && input.description.is_none() {
            return Err(AppError::BadRequest(
                "At least one field is required".to_string(),
            ));
        }

        let playlist = self.find_owned(actor_id, playlist_id).await?;
        let mut active: playlist::ActiveModel = playlist.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description.trim().to_string());
        }
        active.updated_at = Set(Utc::now().into());

        self.playlist_repo.update(active).await
    }

    pub async fn delete(&self, actor_id: &str, playlist_id: &str) -> AppResult<()> {
        let playlist = self.find_owned(actor_id, playlist_id).await?;
        self.playlist_repo.delete(&playlist.id).await
    }

    pub async fn add_video(
        &self,
        actor_id: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<MembershipChange> {
        let playlist = self.find_owned(actor_id, playlist_id).await?;

        if self.video_repo.find_by_id(video_id).await?.is_none() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let added = self
            .playlist_repo
            .add_video(self.id_gen.generate(), &playlist.id, video_id)
            .await?;

        Ok(if added {
            MembershipChange::Added
        } else {
            MembershipChange::AlreadyPresent
        })
    }

    pub async fn remove_video(
        &self,
        actor_id: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<MembershipChange> {
        let playlist = self.find_owned(actor_id, playlist_id).await?;

        let removed = self.playlist_repo.remove_video(&playlist.id, video_id).await?;

        Ok(if removed {
            MembershipChange::Removed
        } else {
            MembershipChange::NotPresent
        })
    }
}
