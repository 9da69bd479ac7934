//! Subscription service.

use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    read_model::{ReadModel, UserSummary},
    repositories::{SubscriptionRepository, UserRepository},
};

use super::ToggleState;

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repo: SubscriptionRepository,
    user_repo: UserRepository,
    read_model: ReadModel,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(
        subscription_repo: SubscriptionRepository,
        user_repo: UserRepository,
        read_model: ReadModel,
    ) -> Self {
        Self {
            subscription_repo,
            user_repo,
            read_model,
            id_gen: IdGenerator::new(),
        }
    }

    /// Subscribe to a channel, or unsubscribe when already subscribed.
    pub async fn toggle(&self, actor_id: &str, channel_id: &str) -> AppResult<ToggleState> {
        if actor_id == channel_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to your own channel".to_string(),
            ));
        }

        if self.user_repo.find_by_id(channel_id).await?.is_none() {
            return Err(AppError::NotFound("Channel not found".to_string()));
        }

        if self.subscription_repo.remove(actor_id, channel_id).await? > 0 {
            tracing::debug!(subscriber_id = %actor_id, channel_id = %channel_id, "Unsubscribed");
            return Ok(ToggleState::Removed);
        }

        self.subscription_repo
            .insert_if_absent(self.id_gen.generate(), actor_id, channel_id)
            .await?;

        tracing::debug!(subscriber_id = %actor_id, channel_id = %channel_id, "Subscribed");
        Ok(ToggleState::Added)
    }

    /// Users subscribed to `channel_id`.
    pub async fn channel_subscribers(&self, channel_id: &str) -> AppResult<Vec<UserSummary>> {
        self.read_model.channel_subscribers(channel_id).await
    }

    /// Channels `subscriber_id` is subscribed to.
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> AppResult<Vec<UserSummary>> {
        self.read_model.subscribed_channels(subscriber_id).await
    }
}

/// Envelope message for a subscription toggle.
#[must_use]
pub const fn toggle_message(state: ToggleState) -> &'static str {
    match state {
        ToggleState::Added => "Subscribed successfully",
        ToggleState::Removed => "Unsubscribed successfully",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{empty_db, exec, user_model};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use vidtube_db::entities::user;

    fn service(sub_db: MockDatabase, user_db: MockDatabase, read_db: MockDatabase) -> SubscriptionService {
        SubscriptionService::new(
            SubscriptionRepository::new(Arc::new(sub_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
            ReadModel::new(Arc::new(read_db.into_connection())),
        )
    }

    fn no_db() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[tokio::test]
    async fn test_subscribe_to_self() {
        let svc = SubscriptionService::new(
            SubscriptionRepository::new(empty_db()),
            UserRepository::new(empty_db()),
            ReadModel::new(empty_db()),
        );

        let result = svc.toggle("user1", "user1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_subscribe_to_missing_channel() {
        let users = no_db().append_query_results([Vec::<user::Model>::new()]);

        let result = service(no_db(), users, no_db()).toggle("user1", "ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_twice_subscribes_then_unsubscribes() {
        let users = no_db().append_query_results([
            [user_model("user2", "bob")],
            [user_model("user2", "bob")],
        ]);
        let subs = no_db().append_exec_results([exec(0), exec(1), exec(1)]);
        let svc = service(subs, users, no_db());

        let first = svc.toggle("user1", "user2").await.unwrap();
        let second = svc.toggle("user1", "user2").await.unwrap();

        assert_eq!(toggle_message(first), "Subscribed successfully");
        assert_eq!(toggle_message(second), "Unsubscribed successfully");
    }

    #[tokio::test]
    async fn test_channel_without_subscribers() {
        let reads = no_db().append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let subscribers = service(no_db(), no_db(), reads)
            .channel_subscribers("user1")
            .await
            .unwrap();

        assert!(subscribers.is_empty());
    }
}
