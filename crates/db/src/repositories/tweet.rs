//! Tweet repository.

use std::sync::Arc;

use super::map_db_err;
use crate::entities::{Tweet, tweet};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use vidtube_common::AppResult;

/// Tweet repository for database operations.
#[derive(Clone)]
pub struct TweetRepository {
    db: Arc<DatabaseConnection>,
}

impl TweetRepository {
    /// Create a new tweet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tweet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tweet::Model>> {
        Tweet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List a user's tweets, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<tweet::Model>> {
        Tweet::find()
            .filter(tweet::Column::OwnerId.eq(owner_id))
            .order_by_desc(tweet::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new tweet.
    pub async fn create(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a tweet.
    pub async fn update(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a tweet by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Tweet::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
