//! Like service.
//!
//! A toggle deletes the (actor, target) pair first and, when nothing was
//! deleted, checks the target and inserts the pair with `ON CONFLICT DO
//! NOTHING`. Two concurrent toggles can therefore never leave duplicate
//! likes behind.

use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    read_model::{ReadModel, VideoWithOwner},
    repositories::{
        CommentRepository, LikeKind, LikeRepository, TweetRepository, VideoRepository,
    },
};

use super::ToggleState;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    tweet_repo: TweetRepository,
    read_model: ReadModel,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        tweet_repo: TweetRepository,
        read_model: ReadModel,
    ) -> Self {
        Self {
            like_repo,
            video_repo,
            comment_repo,
            tweet_repo,
            read_model,
            id_gen: IdGenerator::new(),
        }
    }

    async fn ensure_target_exists(&self, kind: LikeKind, target_id: &str) -> AppResult<()> {
        let exists = match kind {
            LikeKind::Video => self.video_repo.find_by_id(target_id).await?.is_some(),
            LikeKind::Comment => self.comment_repo.find_by_id(target_id).await?.is_some(),
            LikeKind::Tweet => self.tweet_repo.find_by_id(target_id).await?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} not found", kind.label())))
        }
    }

    /// Like the target if the actor has not, unlike it otherwise.
    pub async fn toggle(
        &self,
        actor_id: &str,
        kind: LikeKind,
        target_id: &str,
    ) -> AppResult<ToggleState> {
        // Removal works even when the target has since been deleted.
        if self.like_repo.remove(actor_id, kind, target_id).await? > 0 {
            tracing::debug!(actor_id = %actor_id, target_id = %target_id, kind = kind.label(), "Unliked");
            return Ok(ToggleState::Removed);
        }

        self.ensure_target_exists(kind, target_id).await?;

        let inserted = self
            .like_repo
            .insert_if_absent(self.id_gen.generate(), actor_id, kind, target_id)
            .await?;
        if !inserted {
            tracing::debug!(actor_id = %actor_id, target_id = %target_id, "Concurrent like already present");
        }

        tracing::debug!(actor_id = %actor_id, target_id = %target_id, kind = kind.label(), "Liked");
        Ok(ToggleState::Added)
    }

    /// Number of likes on a target.
    pub async fn count(&self, kind: LikeKind, target_id: &str) -> AppResult<u64> {
        self.like_repo.count_for(kind, target_id).await
    }

    /// Videos the actor has liked, with their owners.
    pub async fn liked_videos(&self, actor_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.read_model.liked_videos(actor_id).await
    }
}

/// Envelope message for a like toggle, e.g. "Video liked".
#[must_use]
pub fn toggle_message(kind: LikeKind, state: ToggleState) -> String {
    match state {
        ToggleState::Added => format!("{} liked", kind.label()),
        ToggleState::Removed => format!("{} unliked", kind.label()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{empty_db, exec, tweet_model, video_model};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use vidtube_db::entities::{comment, video};

    struct Dbs {
        likes: MockDatabase,
        videos: MockDatabase,
        comments: MockDatabase,
        tweets: MockDatabase,
    }

    impl Default for Dbs {
        fn default() -> Self {
            Self {
                likes: MockDatabase::new(DatabaseBackend::Postgres),
                videos: MockDatabase::new(DatabaseBackend::Postgres),
                comments: MockDatabase::new(DatabaseBackend::Postgres),
                tweets: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }
    }

    fn service(dbs: Dbs) -> LikeService {
        LikeService::new(
            LikeRepository::new(Arc::new(dbs.likes.into_connection())),
            VideoRepository::new(Arc::new(dbs.videos.into_connection())),
            CommentRepository::new(Arc::new(dbs.comments.into_connection())),
            TweetRepository::new(Arc::new(dbs.tweets.into_connection())),
            ReadModel::new(empty_db()),
        )
    }

    #[test]
    fn test_toggle_messages() {
        assert_eq!(toggle_message(LikeKind::Video, ToggleState::Added), "Video liked");
        assert_eq!(toggle_message(LikeKind::Comment, ToggleState::Removed), "Comment unliked");
        assert_eq!(toggle_message(LikeKind::Tweet, ToggleState::Added), "Tweet liked");
    }

    #[tokio::test]
    async fn test_toggle_twice_likes_then_unlikes() {
        let dbs = Dbs {
            // Only the inserting toggle looks the target up.
            videos: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video_model("video1", "user1")]]),
            // First toggle: nothing to delete, one row inserted.
            // Second toggle: one row deleted.
            likes: MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(1), exec(1)]),
            ..Dbs::default()
        };
        let svc = service(dbs);

        let first = svc.toggle("user2", LikeKind::Video, "video1").await.unwrap();
        let second = svc.toggle("user2", LikeKind::Video, "video1").await.unwrap();

        assert_eq!(first, ToggleState::Added);
        assert_eq!(second, ToggleState::Removed);
    }

    #[tokio::test]
    async fn test_toggle_lost_insert_race_is_still_added() {
        let dbs = Dbs {
            tweets: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tweet_model("tweet1", "user1")]]),
            likes: MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(0)]),
            ..Dbs::default()
        };

        let state = service(dbs)
            .toggle("user2", LikeKind::Tweet, "tweet1")
            .await
            .unwrap();

        assert!(state.is_added());
    }

    #[tokio::test]
    async fn test_toggle_missing_video() {
        let dbs = Dbs {
            videos: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()]),
            likes: MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]),
            ..Dbs::default()
        };

        let result = service(dbs).toggle("user2", LikeKind::Video, "missing").await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Video not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_missing_comment() {
        let dbs = Dbs {
            comments: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()]),
            likes: MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]),
            ..Dbs::default()
        };

        let result = service(dbs).toggle("user2", LikeKind::Comment, "missing").await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Comment not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlike_after_target_was_deleted() {
        // The video is gone but the like row is still there.
        let dbs = Dbs {
            videos: MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()]),
            likes: MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(1)]),
            ..Dbs::default()
        };

        let state = service(dbs)
            .toggle("user2", LikeKind::Video, "deleted-video")
            .await
            .unwrap();

        assert_eq!(state, ToggleState::Removed);
    }
}
