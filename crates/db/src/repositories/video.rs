//! Video repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{PlaylistVideo, Video, WatchHistory, playlist_video, video, watch_history};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use vidtube_common::AppResult;

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List a user's videos, newest first.
    pub async fn find_by_owner(
        &self,
        owner_id: &str,
        published_only: bool,
    ) -> AppResult<Vec<video::Model>> {
        let mut query = Video::find().filter(video::Column::OwnerId.eq(owner_id));
        if published_only {
            query = query.filter(video::Column::IsPublished.eq(true));
        }

        query
            .order_by_desc(video::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Atomically add one to the view counter.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(video::Column::Views, Expr::col(video::Column::Views).add(1))
            .filter(video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Delete a video together with its playlist memberships and watch
    /// history rows. Comments and likes are left in place.
    ///
    /// Returns whether a video row was deleted.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PlaylistVideo::delete_many()
            .filter(playlist_video::Column::VideoId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        WatchHistory::delete_many()
            .filter(watch_history::Column::VideoId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = Video::delete_by_id(id).exec(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_video(id: &str, owner_id: &str) -> video::Model {
        video::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            video_file_url: format!("http://localhost/media/v1/videos/{id}.mp4"),
            thumbnail_url: format!("http://localhost/media/v1/thumbnails/{id}.png"),
            title: "Title".to_string(),
            description: "Description".to_string(),
            duration: 12.5,
            views: 0,
            is_published: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let video = create_test_video("video1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.find_by_id("video1").await.unwrap();

        assert_eq!(result.unwrap().owner_id, "user1");
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_video("video2", "user1"),
                    create_test_video("video1", "user1"),
                ]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.find_by_owner("user1", false).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "video2");
    }

    #[tokio::test]
    async fn test_delete_prunes_references() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(2), exec(1), exec(1)])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(repo.delete("video1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_video() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(0), exec(0)])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(!repo.delete("missing").await.unwrap());
    }
}
