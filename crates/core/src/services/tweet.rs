//! Tweet service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::tweet,
    repositories::{TweetRepository, UserRepository},
};

use super::not_blank;
use crate::guard::require_owner;

/// Tweet service for business logic.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Tweet body, used for create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct TweetInput {
    #[validate(custom(function = "not_blank"), length(max = 1000))]
    pub content: String,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(tweet_repo: TweetRepository, user_repo: UserRepository) -> Self {
        Self {
            tweet_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn create(&self, actor_id: &str, input: TweetInput) -> AppResult<tweet::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor_id.to_string()),
            content: Set(input.content.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.tweet_repo.create(model).await
    }

    /// List a user's tweets, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<tweet::Model>> {
        if self.user_repo.find_by_id(owner_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        self.tweet_repo.find_by_owner(owner_id).await
    }

    async fn find(&self, tweet_id: &str) -> AppResult<tweet::Model> {
        self.tweet_repo
            .find_by_id(tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))
    }

    pub async fn update(
        &self,
        actor_id: &str,
        tweet_id: &str,
        input: TweetInput,
    ) -> AppResult<tweet::Model> {
        input.validate()?;

        let tweet = self.find(tweet_id).await?;
        require_owner(&tweet, actor_id)?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(input.content.trim().to_string());
        active.updated_at = Set(Utc::now().into());

        self.tweet_repo.update(active).await
    }

    pub async fn delete(&self, actor_id: &str, tweet_id: &str) -> AppResult<()> {
        let tweet = self.find(tweet_id).await?;
        require_owner(&tweet, actor_id)?;

        self.tweet_repo.delete(&tweet.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{
        empty_db, exec, statement_log, tweet_model, user_model, wrote_anything,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use vidtube_db::entities::user;

    fn service(tweet_db: MockDatabase, user_db: MockDatabase) -> TweetService {
        TweetService::new(
            TweetRepository::new(Arc::new(tweet_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
        )
    }

    fn no_db() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let svc = TweetService::new(TweetRepository::new(empty_db()), UserRepository::new(empty_db()));

        let result = svc
            .create("user1", TweetInput { content: "  ".to_string() })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create() {
        let db = no_db().append_query_results([[tweet_model("tweet1", "user1")]]);

        let tweet = service(db, no_db())
            .create("user1", TweetInput { content: "hello".to_string() })
            .await
            .unwrap();

        assert_eq!(tweet.owner_id, "user1");
    }

    #[tokio::test]
    async fn test_list_for_unknown_user() {
        let users = no_db().append_query_results([Vec::<user::Model>::new()]);

        let result = service(no_db(), users).list_by_owner("ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let users = no_db().append_query_results([[user_model("user1", "alice")]]);
        let tweets = no_db().append_query_results([[
            tweet_model("tweet2", "user1"),
            tweet_model("tweet1", "user1"),
        ]]);

        let result = service(tweets, users).list_by_owner("user1").await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let db = no_db().append_query_results([[tweet_model("tweet1", "user1")]]);

        let result = service(db, no_db())
            .update("user2", "tweet1", TweetInput { content: "hijack".to_string() })
            .await;

        match result {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "You are not the owner of this tweet"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_missing_tweet() {
        let db = no_db().append_query_results([Vec::<tweet::Model>::new()]);

        let result = service(db, no_db()).delete("user1", "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let db = no_db()
            .append_query_results([[tweet_model("tweet1", "user1")]])
            .append_exec_results([exec(1)]);

        assert!(service(db, no_db()).delete("user1", "tweet1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let conn = Arc::new(
            no_db()
                .append_query_results([[tweet_model("tweet1", "user1")]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let svc = TweetService::new(
            TweetRepository::new(Arc::clone(&conn)),
            UserRepository::new(empty_db()),
        );

        let result = svc.delete("user2", "tweet1").await;
        match result {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "You are not the owner of this tweet"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }

        drop(svc);
        assert!(!wrote_anything(&statement_log(conn)));
    }
}
