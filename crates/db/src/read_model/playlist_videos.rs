//! A playlist with its videos attached.

use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select,
};
use serde::Serialize;
use vidtube_common::AppResult;

use super::ReadModel;
use crate::entities::{Playlist, Video, playlist, playlist_video, video};
use crate::repositories::map_db_err;

/// A playlist plus its videos in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithVideos {
    #[serde(flatten)]
    pub playlist: playlist::Model,
    pub video_details: Vec<video::Model>,
}

/// Match the playlist by id.
#[must_use]
pub fn match_playlist(playlist_id: &str) -> Select<Playlist> {
    Playlist::find_by_id(playlist_id)
}

/// Videos of a playlist through the membership table, oldest entry first.
#[must_use]
pub fn videos_in_playlist(playlist_id: &str) -> Select<Video> {
    Video::find()
        .join(JoinType::InnerJoin, playlist_video::Relation::Video.def().rev())
        .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
        .order_by_asc(playlist_video::Column::Id)
}

impl ReadModel {
    /// Load a playlist and attach its videos.
    pub async fn playlist_with_videos(
        &self,
        playlist_id: &str,
    ) -> AppResult<Option<PlaylistWithVideos>> {
        let Some(playlist) = match_playlist(playlist_id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let video_details = videos_in_playlist(&playlist.id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(Some(PlaylistWithVideos {
            playlist,
            video_details,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, QueryTrait};
    use std::sync::Arc;

    fn create_test_playlist() -> playlist::Model {
        playlist::Model {
            id: "playlist1".to_string(),
            owner_id: "user1".to_string(),
            name: "Favourites".to_string(),
            description: "The good ones".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_video(id: &str) -> video::Model {
        video::Model {
            id: id.to_string(),
            owner_id: "user2".to_string(),
            video_file_url: format!("http://localhost/media/v1/videos/{id}.mp4"),
            thumbnail_url: format!("http://localhost/media/v1/thumbnails/{id}.png"),
            title: id.to_string(),
            description: String::new(),
            duration: 3.0,
            views: 1,
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_videos_in_playlist_stage() {
        let sql = videos_in_playlist("playlist1")
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"INNER JOIN "playlist_video" ON "video"."id" = "playlist_video"."video_id""#));
        assert!(sql.contains(r#""playlist_video"."playlist_id" = 'playlist1'"#));
        assert!(sql.contains(r#"ORDER BY "playlist_video"."id" ASC"#));
    }

    #[tokio::test]
    async fn test_playlist_with_videos() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_playlist()]])
                .append_query_results([[create_test_video("video1"), create_test_video("video2")]])
                .into_connection(),
        );

        let result = ReadModel::new(db)
            .playlist_with_videos("playlist1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.video_details.len(), 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "Favourites");
        assert_eq!(json["videoDetails"][1]["id"], "video2");
    }

    #[tokio::test]
    async fn test_missing_playlist() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<playlist::Model>::new()])
                .into_connection(),
        );

        let result = ReadModel::new(db).playlist_with_videos("nope").await.unwrap();
        assert!(result.is_none());
    }
}
