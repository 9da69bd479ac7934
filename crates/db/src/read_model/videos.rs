//! Video listings with the uploader attached: a channel's uploads, the
//! videos a user liked, and a user's watch history.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use vidtube_common::AppResult;

use super::{ReadModel, UserSummary};
use crate::entities::{Video, like, user, video, watch_history};
use crate::repositories::map_db_err;

/// Flat row produced by [`with_owner`].
#[derive(Debug, Clone, FromQueryResult)]
pub struct VideoOwnerRow {
    pub id: String,
    pub owner_id: String,
    pub video_file_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub owner_username: Option<String>,
    pub owner_fullname: Option<String>,
    pub owner_avatar_url: Option<String>,
}

/// A video with its uploader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    #[serde(flatten)]
    pub video: video::Model,
    pub owner: Option<UserSummary>,
}

impl From<VideoOwnerRow> for VideoWithOwner {
    fn from(row: VideoOwnerRow) -> Self {
        let owner = match (row.owner_username, row.owner_fullname, row.owner_avatar_url) {
            (Some(username), Some(fullname), Some(avatar_url)) => Some(UserSummary {
                id: row.owner_id.clone(),
                username,
                fullname,
                avatar_url,
            }),
            _ => None,
        };

        Self {
            video: video::Model {
                id: row.id,
                owner_id: row.owner_id,
                video_file_url: row.video_file_url,
                thumbnail_url: row.thumbnail_url,
                title: row.title,
                description: row.description,
                duration: row.duration,
                views: row.views,
                is_published: row.is_published,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            owner,
        }
    }
}

/// Left-join the uploader and project the summary columns.
#[must_use]
pub fn with_owner(select: Select<Video>) -> Select<Video> {
    select
        .join(JoinType::LeftJoin, video::Relation::Owner.def())
        .column_as(user::Column::Username, "owner_username")
        .column_as(user::Column::Fullname, "owner_fullname")
        .column_as(user::Column::AvatarUrl, "owner_avatar_url")
}

/// Videos uploaded by `owner_id`, newest first.
#[must_use]
pub fn owned_by(owner_id: &str) -> Select<Video> {
    Video::find()
        .filter(video::Column::OwnerId.eq(owner_id))
        .order_by_desc(video::Column::Id)
}

/// Videos liked by `user_id`, most recent like first.
#[must_use]
pub fn liked_by(user_id: &str) -> Select<Video> {
    Video::find()
        .join(JoinType::InnerJoin, video::Relation::Like.def())
        .filter(like::Column::LikedById.eq(user_id))
        .order_by_desc(like::Column::Id)
}

/// Videos watched by `user_id`, most recently watched first.
#[must_use]
pub fn watched_by(user_id: &str) -> Select<Video> {
    Video::find()
        .join(JoinType::InnerJoin, watch_history::Relation::Video.def().rev())
        .filter(watch_history::Column::UserId.eq(user_id))
        .order_by_desc(watch_history::Column::WatchedAt)
}

impl ReadModel {
    async fn videos_with_owner(&self, select: Select<Video>) -> AppResult<Vec<VideoWithOwner>> {
        let rows = with_owner(select)
            .into_model::<VideoOwnerRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(VideoWithOwner::from).collect())
    }

    /// All videos of a channel.
    pub async fn channel_videos(&self, owner_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.videos_with_owner(owned_by(owner_id)).await
    }

    /// Videos the user has liked.
    pub async fn liked_videos(&self, user_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.videos_with_owner(liked_by(user_id)).await
    }

    /// The user's watch history.
    pub async fn watch_history(&self, user_id: &str) -> AppResult<Vec<VideoWithOwner>> {
        self.videos_with_owner(watched_by(user_id)).await
    }
}
