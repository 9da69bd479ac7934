//! Comment service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::comment,
    read_model::{Page, ReadModel, VideoComment},
    repositories::{CommentRepository, VideoRepository},
};

use super::not_blank;
use crate::guard::require_owner;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    read_model: ReadModel,
    id_gen: IdGenerator,
}

/// Comment body, used for add and update.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(custom(function = "not_blank"), length(max = 2000))]
    pub content: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
        read_model: ReadModel,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            read_model,
            id_gen: IdGenerator::new(),
        }
    }

    async fn ensure_video_exists(&self, video_id: &str) -> AppResult<()> {
        match self.video_repo.find_by_id(video_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Video not found".to_string())),
        }
    }

    /// One page of a video's comments, newest first, each with its author.
    ///
    /// An existing video with no comments on the requested page is reported
    /// as NotFound with its own message.
    pub async fn list_for_video(&self, video_id: &str, page: Page) -> AppResult<Vec<VideoComment>> {
        self.ensure_video_exists(video_id).await?;

        let comments = self.read_model.video_comments(video_id, page).await?;
        if comments.is_empty() {
            return Err(AppError::NotFound(
                "No comments found for this video".to_string(),
            ));
        }
        Ok(comments)
    }

    pub async fn add(
        &self,
        actor_id: &str,
        video_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;
        self.ensure_video_exists(video_id).await?;

        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: Set(video_id.to_string()),
            owner_id: Set(actor_id.to_string()),
            content: Set(input.content.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.comment_repo.create(model).await
    }

    async fn find(&self, comment_id: &str) -> AppResult<comment::Model> {
        self.comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    pub async fn update(
        &self,
        actor_id: &str,
        comment_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let comment = self.find(comment_id).await?;
        require_owner(&comment, actor_id)?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(input.content.trim().to_string());
        active.updated_at = Set(Utc::now().into());

        self.comment_repo.update(active).await
    }

    pub async fn delete(&self, actor_id: &str, comment_id: &str) -> AppResult<()> {
        let comment = self.find(comment_id).await?;
        require_owner(&comment, actor_id)?;

        self.comment_repo.delete(&comment.id).await
    }
}
