//! Like repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{Like, like};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use vidtube_common::AppResult;

/// What a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeKind {
    Video,
    Comment,
    Tweet,
}

impl LikeKind {
    /// Column holding the target id for this kind.
    #[must_use]
    pub const fn column(self) -> like::Column {
        match self {
            Self::Video => like::Column::VideoId,
            Self::Comment => like::Column::CommentId,
            Self::Tweet => like::Column::TweetId,
        }
    }

    /// Human-readable name, capitalized.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Comment => "Comment",
            Self::Tweet => "Tweet",
        }
    }
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Delete the like `actor_id` holds on the target.
    ///
    /// Returns the number of rows removed (0 or 1).
    pub async fn remove(&self, actor_id: &str, kind: LikeKind, target_id: &str) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::LikedById.eq(actor_id))
            .filter(kind.column().eq(target_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Insert a like unless one already exists for (actor, target).
    ///
    /// Returns whether a row was inserted. A concurrent insert that won the
    /// race leaves this call a no-op.
    pub async fn insert_if_absent(
        &self,
        id: String,
        actor_id: &str,
        kind: LikeKind,
        target_id: &str,
    ) -> AppResult<bool> {
        let now = Utc::now();
        let target = Some(target_id.to_string());
        let model = like::ActiveModel {
            id: Set(id),
            liked_by_id: Set(actor_id.to_string()),
            video_id: Set(if kind == LikeKind::Video { target.clone() } else { None }),
            comment_id: Set(if kind == LikeKind::Comment { target.clone() } else { None }),
            tweet_id: Set(if kind == LikeKind::Tweet { target } else { None }),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let inserted = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::LikedById, kind.column()])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(inserted > 0)
    }

    /// Count likes on a target.
    pub async fn count_for(&self, kind: LikeKind, target_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(kind.column().eq(target_id))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, MockExecResult, QueryTrait, Value};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_insert_targets_the_matching_unique_index() {
        let model = like::ActiveModel {
            id: Set("like1".to_string()),
            liked_by_id: Set("user1".to_string()),
            video_id: Set(None),
            comment_id: Set(Some("comment1".to_string())),
            tweet_id: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        let sql = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::LikedById, LikeKind::Comment.column()])
                    .do_nothing()
                    .to_owned(),
            )
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"ON CONFLICT ("liked_by_id", "comment_id") DO NOTHING"#));
    }

    #[tokio::test]
    async fn test_remove_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert_eq!(repo.remove("user1", LikeKind::Video, "video1").await.unwrap(), 1);
        assert_eq!(repo.remove("user1", LikeKind::Video, "video1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_if_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo
            .insert_if_absent("like1".into(), "user1", LikeKind::Tweet, "tweet1")
            .await
            .unwrap());
        assert!(!repo
            .insert_if_absent("like2".into(), "user1", LikeKind::Tweet, "tweet1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_count_for() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => Into::<Value>::into(4i64),
                }]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert_eq!(repo.count_for(LikeKind::Video, "video1").await.unwrap(), 4);
    }
}
