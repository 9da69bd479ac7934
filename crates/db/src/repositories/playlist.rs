//! Playlist repository.
//!
//! Membership edits are single statements against `playlist_video`, so two
//! editors of the same playlist never overwrite each other's changes.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{Playlist, PlaylistVideo, playlist, playlist_video};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use vidtube_common::AppResult;

/// Playlist repository for database operations.
#[derive(Clone)]
pub struct PlaylistRepository {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepository {
    /// Create a new playlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<playlist::Model>> {
        Playlist::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List a user's playlists, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<playlist::Model>> {
        Playlist::find()
            .filter(playlist::Column::OwnerId.eq(owner_id))
            .order_by_desc(playlist::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new playlist.
    pub async fn create(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a playlist.
    pub async fn update(&self, model: playlist::ActiveModel) -> AppResult<playlist::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a playlist. Its memberships go with it through the foreign key.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Playlist::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Add a video to a playlist if it is not already there.
    ///
    /// Returns `true` when the video was added, `false` when already present.
    pub async fn add_video(&self, id: String, playlist_id: &str, video_id: &str) -> AppResult<bool> {
        let model = playlist_video::ActiveModel {
            id: Set(id),
            playlist_id: Set(playlist_id.to_string()),
            video_id: Set(video_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = PlaylistVideo::insert(model)
            .on_conflict(
                OnConflict::columns([
                    playlist_video::Column::PlaylistId,
                    playlist_video::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(inserted > 0)
    }

    /// Remove a video from a playlist.
    ///
    /// Returns `true` when the video was removed, `false` when not present.
    pub async fn remove_video(&self, playlist_id: &str, video_id: &str) -> AppResult<bool> {
        let result = PlaylistVideo::delete_many()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_add_same_video_twice() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert!(repo.add_video("pv1".into(), "playlist1", "video1").await.unwrap());
        assert!(!repo.add_video("pv2".into(), "playlist1", "video1").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_absent_video_is_not_an_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = PlaylistRepository::new(db);
        assert!(!repo.remove_video("playlist1", "video9").await.unwrap());
    }
}
