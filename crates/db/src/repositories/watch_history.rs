//! Watch history repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{WatchHistory, watch_history};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use vidtube_common::AppResult;

/// Watch history repository for database operations.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchHistoryRepository {
    /// Create a new watch history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that `user_id` watched `video_id` now.
    ///
    /// Re-watching moves the video to the front of the history.
    pub async fn record(&self, id: String, user_id: &str, video_id: &str) -> AppResult<()> {
        let model = watch_history::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            video_id: Set(video_id.to_string()),
            watched_at: Set(Utc::now().into()),
        };

        WatchHistory::insert(model)
            .on_conflict(
                OnConflict::columns([watch_history::Column::UserId, watch_history::Column::VideoId])
                    .update_column(watch_history::Column::WatchedAt)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
