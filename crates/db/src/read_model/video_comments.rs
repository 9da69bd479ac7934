//! Comments on a video, each with a summary of its author.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use vidtube_common::AppResult;

use super::{Page, ReadModel, UserSummary};
use crate::entities::{Comment, comment, user};
use crate::repositories::map_db_err;

/// Flat row produced by the owner join.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub owner_username: Option<String>,
    pub owner_fullname: Option<String>,
    pub owner_avatar_url: Option<String>,
}

/// A comment with its author attached. `owner` is absent when the author
/// row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoComment {
    pub id: String,
    pub video_id: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub owner: Option<UserSummary>,
}

/// Comments on `video_id`.
#[must_use]
pub fn comments_for_video(video_id: &str) -> Select<Comment> {
    Comment::find().filter(comment::Column::VideoId.eq(video_id))
}

/// Left-join the author and project the summary columns.
#[must_use]
pub fn join_owner(select: Select<Comment>) -> Select<Comment> {
    select
        .join(JoinType::LeftJoin, comment::Relation::Owner.def())
        .column_as(user::Column::Username, "owner_username")
        .column_as(user::Column::Fullname, "owner_fullname")
        .column_as(user::Column::AvatarUrl, "owner_avatar_url")
}

/// Newest first, one page.
#[must_use]
pub fn paginate(select: Select<Comment>, page: Page) -> Select<Comment> {
    select
        .order_by_desc(comment::Column::Id)
        .offset(page.offset())
        .limit(page.limit)
}

/// Fold the joined author columns into an optional `owner` object.
#[must_use]
pub fn flatten_owner(rows: Vec<CommentRow>) -> Vec<VideoComment> {
    rows.into_iter()
        .map(|row| {
            let owner = match (row.owner_username, row.owner_fullname, row.owner_avatar_url) {
                (Some(username), Some(fullname), Some(avatar_url)) => Some(UserSummary {
                    id: row.owner_id,
                    username,
                    fullname,
                    avatar_url,
                }),
                _ => None,
            };

            VideoComment {
                id: row.id,
                video_id: row.video_id,
                content: row.content,
                created_at: row.created_at,
                updated_at: row.updated_at,
                owner,
            }
        })
        .collect()
}

impl ReadModel {
    /// One page of comments on a video.
    pub async fn video_comments(&self, video_id: &str, page: Page) -> AppResult<Vec<VideoComment>> {
        let rows = paginate(join_owner(comments_for_video(video_id)), page)
            .into_model::<CommentRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(flatten_owner(rows))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn row(id: &str, owner: Option<&str>) -> CommentRow {
        CommentRow {
            id: id.to_string(),
            video_id: "video1".to_string(),
            owner_id: "user1".to_string(),
            content: "first".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            owner_username: owner.map(str::to_string),
            owner_fullname: owner.map(str::to_uppercase),
            owner_avatar_url: owner.map(|o| format!("http://localhost/media/v1/avatars/{o}.png")),
        }
    }

    #[test]
    fn test_join_owner_stage() {
        let sql = join_owner(comments_for_video("video1"))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "user" ON "comment"."owner_id" = "user"."id""#));
        assert!(sql.contains(r#""user"."username" AS "owner_username""#));
        assert!(sql.contains(r#""comment"."video_id" = 'video1'"#));
        assert!(!sql.contains("password_hash"));
    }

    #[test]
    fn test_paginate_stage() {
        let sql = paginate(comments_for_video("video1"), Page::new(Some(2), Some(5)))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("LIMIT 5"));
        assert!(sql.contains("OFFSET 5"));
    }

    #[test]
    fn test_flatten_owner() {
        let comments = flatten_owner(vec![row("c1", Some("alice")), row("c2", None)]);

        let owner = comments[0].owner.as_ref().unwrap();
        assert_eq!(owner.id, "user1");
        assert_eq!(owner.username, "alice");
        assert!(comments[1].owner.is_none());
    }

    #[tokio::test]
    async fn test_video_comments() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let db_row: BTreeMap<&str, Value> = btreemap! {
            "id" => Into::<Value>::into("c1"),
            "video_id" => Into::<Value>::into("video1"),
            "owner_id" => Into::<Value>::into("user2"),
            "content" => Into::<Value>::into("great video"),
            "created_at" => Into::<Value>::into(now),
            "updated_at" => Into::<Value>::into(now),
            "owner_username" => Into::<Value>::into("bob"),
            "owner_fullname" => Into::<Value>::into("Bob"),
            "owner_avatar_url" => Into::<Value>::into("http://localhost/media/v1/avatars/b.png"),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[db_row]])
                .into_connection(),
        );

        let comments = ReadModel::new(db)
            .video_comments("video1", Page::default())
            .await
            .unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].owner.as_ref().unwrap().username, "bob");

        let json = serde_json::to_value(&comments[0]).unwrap();
        assert_eq!(json["owner"]["avatarUrl"], "http://localhost/media/v1/avatars/b.png");
        assert_eq!(json["videoId"], "video1");
    }
}
