//! Fixtures shared by the service tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use vidtube_common::{AppResult, MediaKind, MediaStorage, SharedMediaStorage, UploadedMedia};
use vidtube_db::entities::{comment, playlist, tweet, user, video};

pub fn empty_db() -> Arc<DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

/// Statements a mock connection saw, once every other handle to it is gone.
pub fn statement_log(conn: Arc<DatabaseConnection>) -> String {
    let conn = Arc::try_unwrap(conn).ok().unwrap();
    format!("{:?}", conn.into_transaction_log())
}

/// Whether anything besides reads reached the connection.
pub fn wrote_anything(log: &str) -> bool {
    ["INSERT", "UPDATE", "DELETE"].iter().any(|verb| log.contains(verb))
}

pub const fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn user_model(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        fullname: username.to_uppercase(),
        avatar_url: format!("http://localhost/media/v1/avatars/{id}.png"),
        cover_image_url: None,
        password_hash: "hash".to_string(),
        refresh_token: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

pub fn video_model(id: &str, owner_id: &str) -> video::Model {
    video::Model {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        video_file_url: format!("http://localhost/media/v1/videos/{id}.mp4"),
        thumbnail_url: format!("http://localhost/media/v1/thumbnails/{id}.png"),
        title: "Title".to_string(),
        description: "Description".to_string(),
        duration: 30.0,
        views: 0,
        is_published: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

pub fn tweet_model(id: &str, owner_id: &str) -> tweet::Model {
    tweet::Model {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        content: "hello".to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

pub fn comment_model(id: &str, video_id: &str, owner_id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        video_id: video_id.to_string(),
        owner_id: owner_id.to_string(),
        content: "nice".to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

pub fn playlist_model(id: &str, owner_id: &str) -> playlist::Model {
    playlist::Model {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: "Favourites".to_string(),
        description: "Best videos".to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// Media storage that accepts everything and remembers deletions.
#[derive(Default)]
pub struct StubStorage {
    pub deleted: Mutex<Vec<String>>,
}

impl StubStorage {
    pub fn shared() -> (Arc<Self>, SharedMediaStorage) {
        let stub = Arc::new(Self::default());
        let media: SharedMediaStorage = stub.clone();
        (stub, media)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaStorage for StubStorage {
    async fn upload(
        &self,
        _data: &[u8],
        content_type: &str,
        folder: &str,
    ) -> AppResult<UploadedMedia> {
        let public_id = format!("{folder}/new");
        let duration = content_type.starts_with("video/").then_some(42.0);
        Ok(UploadedMedia {
            url: format!("http://localhost/media/v2/{public_id}.bin"),
            public_id,
            duration,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> AppResult<()> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
