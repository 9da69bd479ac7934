//! Who subscribes to a channel, and which channels a user subscribes to.

use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select,
};
use vidtube_common::AppResult;

use super::{ReadModel, UserSummary};
use crate::entities::{User, subscription, user};
use crate::repositories::map_db_err;

fn summary_columns(select: Select<User>) -> Select<User> {
    select.select_only().columns([
        user::Column::Id,
        user::Column::Username,
        user::Column::Fullname,
        user::Column::AvatarUrl,
    ])
}

/// Users subscribed to `channel_id`, newest subscription first.
#[must_use]
pub fn subscriber_summaries_for(channel_id: &str) -> Select<User> {
    summary_columns(User::find())
        .join(JoinType::InnerJoin, subscription::Relation::Subscriber.def().rev())
        .filter(subscription::Column::ChannelId.eq(channel_id))
        .order_by_desc(subscription::Column::Id)
}

/// Channels `subscriber_id` is subscribed to, newest subscription first.
#[must_use]
pub fn channel_summaries_for(subscriber_id: &str) -> Select<User> {
    summary_columns(User::find())
        .join(JoinType::InnerJoin, subscription::Relation::Channel.def().rev())
        .filter(subscription::Column::SubscriberId.eq(subscriber_id))
        .order_by_desc(subscription::Column::Id)
}

impl ReadModel {
    /// Subscribers of a channel.
    pub async fn channel_subscribers(&self, channel_id: &str) -> AppResult<Vec<UserSummary>> {
        subscriber_summaries_for(channel_id)
            .into_model::<UserSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Channels a user is subscribed to.
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> AppResult<Vec<UserSummary>> {
        channel_summaries_for(subscriber_id)
            .into_model::<UserSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn test_subscriber_join_direction() {
        let sql = subscriber_summaries_for("user1")
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"ON "user"."id" = "subscription"."subscriber_id""#));
        assert!(sql.contains(r#""subscription"."channel_id" = 'user1'"#));
    }

    #[test]
    fn test_channel_join_direction() {
        let sql = channel_summaries_for("user2")
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"ON "user"."id" = "subscription"."channel_id""#));
        assert!(sql.contains(r#""subscription"."subscriber_id" = 'user2'"#));
        assert!(!sql.contains("email"));
    }

    #[tokio::test]
    async fn test_channel_subscribers() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "id" => Into::<Value>::into("user2"),
                    "username" => Into::<Value>::into("bob"),
                    "fullname" => Into::<Value>::into("Bob"),
                    "avatar_url" => Into::<Value>::into("http://localhost/media/v1/avatars/b.png"),
                }]])
                .into_connection(),
        );

        let subscribers = ReadModel::new(db).channel_subscribers("user1").await.unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].username, "bob");
    }

    #[tokio::test]
    async fn test_no_subscriptions_is_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let channels = ReadModel::new(db).subscribed_channels("user1").await.unwrap();
        assert!(channels.is_empty());
    }
}
