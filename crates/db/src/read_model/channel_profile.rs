//! Channel profile: a user's public fields plus subscription counts and
//! whether the viewer is subscribed, in one statement.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect, Select,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use serde::Serialize;
use vidtube_common::AppResult;

use super::ReadModel;
use crate::entities::{User, user};
use crate::repositories::map_db_err;

/// A channel as shown on its profile page.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// Match the user by case-folded username. Starts an empty projection.
#[must_use]
pub fn match_username(username: &str) -> Select<User> {
    User::find()
        .select_only()
        .filter(user::Column::Username.eq(username.trim().to_lowercase()))
}

/// Count subscriptions where this user is the channel.
#[must_use]
pub fn with_subscribers_count(select: Select<User>) -> Select<User> {
    select.column_as(
        Expr::cust(
            r#"(SELECT COUNT(*) FROM "subscription" WHERE "subscription"."channel_id" = "user"."id")"#,
        ),
        "subscribers_count",
    )
}

/// Count subscriptions where this user is the subscriber.
#[must_use]
pub fn with_subscribed_to_count(select: Select<User>) -> Select<User> {
    select.column_as(
        Expr::cust(
            r#"(SELECT COUNT(*) FROM "subscription" WHERE "subscription"."subscriber_id" = "user"."id")"#,
        ),
        "channels_subscribed_to_count",
    )
}

/// Test whether `viewer_id` is among the channel's subscribers.
///
/// Always false for anonymous viewers.
#[must_use]
pub fn with_is_subscribed(select: Select<User>, viewer_id: Option<&str>) -> Select<User> {
    match viewer_id {
        Some(viewer_id) => select.column_as(
            Expr::cust_with_values(
                r#"EXISTS(SELECT 1 FROM "subscription" WHERE "subscription"."channel_id" = "user"."id" AND "subscription"."subscriber_id" = ?)"#,
                [viewer_id.to_string()],
            ),
            "is_subscribed",
        ),
        None => select.column_as(Expr::value(false), "is_subscribed"),
    }
}

/// Project the public user columns. Credentials are never selected.
#[must_use]
pub fn project_public(select: Select<User>) -> Select<User> {
    select.columns([
        user::Column::Id,
        user::Column::Username,
        user::Column::Email,
        user::Column::Fullname,
        user::Column::AvatarUrl,
        user::Column::CoverImageUrl,
        user::Column::CreatedAt,
    ])
}

/// Compose the full channel profile query.
#[must_use]
pub fn channel_profile_query(username: &str, viewer_id: Option<&str>) -> Select<User> {
    let select = match_username(username);
    let select = with_subscribers_count(select);
    let select = with_subscribed_to_count(select);
    let select = with_is_subscribed(select, viewer_id);
    project_public(select)
}

impl ReadModel {
    /// Load a channel profile by username, as seen by `viewer_id`.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<Option<ChannelProfile>> {
        channel_profile_query(username, viewer_id)
            .into_model::<ChannelProfile>()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
