//! Channel service: public profiles and the owner's dashboard.

use vidtube_common::{AppError, AppResult};
use vidtube_db::read_model::{ChannelProfile, ChannelStats, ReadModel, VideoWithOwner};

/// Channel service for business logic.
#[derive(Clone)]
pub struct ChannelService {
    read_model: ReadModel,
}

impl ChannelService {
    /// Create a new channel service.
    #[must_use]
    pub const fn new(read_model: ReadModel) -> Self {
        Self { read_model }
    }

    /// Public profile of the channel named `username`, with subscription
    /// counts and whether `viewer_id` is subscribed.
    pub async fn profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<ChannelProfile> {
        if username.trim().is_empty() {
            return Err(AppError::BadRequest("Username is missing".to_string()));
        }

        self.read_model
            .channel_profile(username, viewer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))
    }

    pub async fn stats(&self, actor_id: &str) -> AppResult<ChannelStats> {
        self.read_model.channel_stats(actor_id).await
    }

    pub async fn videos(&self, actor_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.read_model.channel_videos(actor_id).await
    }

    /// The actor's watch history, most recent first.
    pub async fn watch_history(&self, actor_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.read_model.watch_history(actor_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::empty_db;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn service(db: MockDatabase) -> ChannelService {
        ChannelService::new(ReadModel::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_profile_requires_username() {
        let result = ChannelService::new(ReadModel::new(empty_db()))
            .profile("   ", None)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let result = service(db).profile("ghost", Some("user1")).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Channel does not exist"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_watch_history() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let history = service(db).watch_history("user1").await.unwrap();
        assert!(history.is_empty());
    }
}
