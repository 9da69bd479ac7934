//! Subscription repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{Subscription, subscription};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use vidtube_common::AppResult;

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Delete the (subscriber, channel) pair. Returns rows removed.
    pub async fn remove(&self, subscriber_id: &str, channel_id: &str) -> AppResult<u64> {
        let result = Subscription::delete_many()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::ChannelId.eq(channel_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Insert the (subscriber, channel) pair unless it already exists.
    pub async fn insert_if_absent(
        &self,
        id: String,
        subscriber_id: &str,
        channel_id: &str,
    ) -> AppResult<bool> {
        let now = Utc::now();
        let model = subscription::ActiveModel {
            id: Set(id),
            subscriber_id: Set(subscriber_id.to_string()),
            channel_id: Set(channel_id.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let inserted = Subscription::insert(model)
            .on_conflict(
                OnConflict::columns([
                    subscription::Column::SubscriberId,
                    subscription::Column::ChannelId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(inserted > 0)
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
    async fn test_remove_then_insert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(1)])
                .into_connection(),
        );

        let repo = SubscriptionRepository::new(db);
        assert_eq!(repo.remove("user2", "user1").await.unwrap(), 0);
        assert!(repo
            .insert_if_absent("sub1".into(), "user2", "user1")
            .await
            .unwrap());
    }
}
