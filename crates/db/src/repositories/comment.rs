//! Comment repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{Comment, comment};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use vidtube_common::AppResult;

/// Comment repository for database operations.
///
/// Comment listings go through the read model, which joins owners.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a comment by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    #[tokio::test]
    async fn test_create_comment() {
        let now = Utc::now();
        let created = comment::Model {
            id: "comment1".to_string(),
            video_id: "video1".to_string(),
            owner_id: "user1".to_string(),
            content: "nice".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created.clone()]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo
            .create(comment::ActiveModel {
                id: Set("comment1".to_string()),
                video_id: Set("video1".to_string()),
                owner_id: Set("user1".to_string()),
                content: Set("nice".to_string()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            })
            .await
            .unwrap();

        assert_eq!(result, created);
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(repo.delete("comment1").await.is_ok());
    }
}
