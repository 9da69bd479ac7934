//! Channel statistics for the dashboard.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait, Select, sea_query::Expr,
};
use serde::Serialize;
use vidtube_common::AppResult;

use super::ReadModel;
use crate::entities::{Like, Subscription, Video, like, subscription, video};
use crate::repositories::map_db_err;

/// Aggregate numbers for one channel. Empty aggregates are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_subscribers: u64,
    pub total_subscribed_to: u64,
    pub total_videos: u64,
    pub total_likes: u64,
    pub total_views: i64,
}

#[derive(Debug, FromQueryResult)]
struct ViewsTotal {
    total_views: i64,
}

/// Subscriptions where `channel_id` is the channel.
#[must_use]
pub fn subscribers_of(channel_id: &str) -> Select<Subscription> {
    Subscription::find().filter(subscription::Column::ChannelId.eq(channel_id))
}

/// Subscriptions where `subscriber_id` is the subscriber.
#[must_use]
pub fn subscriptions_of(subscriber_id: &str) -> Select<Subscription> {
    Subscription::find().filter(subscription::Column::SubscriberId.eq(subscriber_id))
}

/// Videos owned by `owner_id`.
#[must_use]
pub fn videos_of(owner_id: &str) -> Select<Video> {
    Video::find().filter(video::Column::OwnerId.eq(owner_id))
}

/// Likes joined to videos, restricted to videos owned by `owner_id`.
#[must_use]
pub fn likes_on_videos_of(owner_id: &str) -> Select<Like> {
    Like::find()
        .join(JoinType::InnerJoin, like::Relation::Video.def())
        .filter(video::Column::OwnerId.eq(owner_id))
}

/// Sum of views over videos owned by `owner_id`, zero when there are none.
#[must_use]
pub fn views_of(owner_id: &str) -> Select<Video> {
    videos_of(owner_id).select_only().column_as(
        Expr::cust(r#"CAST(COALESCE(SUM("video"."views"), 0) AS BIGINT)"#),
        "total_views",
    )
}

impl ReadModel {
    /// Compute the dashboard statistics for a channel.
    pub async fn channel_stats(&self, owner_id: &str) -> AppResult<ChannelStats> {
        let db = self.db.as_ref();

        let total_subscribers = subscribers_of(owner_id).count(db).await.map_err(map_db_err)?;
        let total_subscribed_to = subscriptions_of(owner_id).count(db).await.map_err(map_db_err)?;
        let total_videos = videos_of(owner_id).count(db).await.map_err(map_db_err)?;
        let total_likes = likes_on_videos_of(owner_id).count(db).await.map_err(map_db_err)?;
        let total_views = views_of(owner_id)
            .into_model::<ViewsTotal>()
            .one(db)
            .await
            .map_err(map_db_err)?
            .map_or(0, |row| row.total_views);

        Ok(ChannelStats {
            total_subscribers,
            total_subscribed_to,
            total_videos,
            total_likes,
            total_views,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait, Value};
    use std::sync::Arc;

    fn count(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Into::<Value>::into(n) }
    }

    #[test]
    fn test_likes_join_filters_by_video_owner() {
        let sql = likes_on_videos_of("user1").build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#"INNER JOIN "video" ON "like"."video_id" = "video"."id""#));
        assert!(sql.contains(r#""video"."owner_id" = 'user1'"#));
    }

    #[test]
    fn test_views_sum_defaults_to_zero() {
        let sql = views_of("user1").build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#"COALESCE(SUM("video"."views"), 0)"#));
        assert!(sql.contains(r#"AS "total_views""#));
    }

    #[tokio::test]
    async fn test_channel_without_videos_is_all_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [count(0)],
                    [count(0)],
                    [count(0)],
                    [count(0)],
                    [btreemap! { "total_views" => Into::<Value>::into(0i64) }],
                ])
                .into_connection(),
        );

        let stats = ReadModel::new(db).channel_stats("user1").await.unwrap();
        assert_eq!(stats, ChannelStats::default());
    }

    #[tokio::test]
    async fn test_channel_stats() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [count(3)],
                    [count(1)],
                    [count(2)],
                    [count(7)],
                    [btreemap! { "total_views" => Into::<Value>::into(150i64) }],
                ])
                .into_connection(),
        );

        let stats = ReadModel::new(db).channel_stats("user1").await.unwrap();
        assert_eq!(stats.total_subscribers, 3);
        assert_eq!(stats.total_subscribed_to, 1);
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_likes, 7);
        assert_eq!(stats.total_views, 150);

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalViews"], 150);
    }
}
