//! Test utilities for database operations.
//!
//! Live-database helpers for the ignored integration tests: a throwaway,
//! migrated `PostgreSQL` database per test and fixture inserts for users and
//! videos.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use vidtube_common::IdGenerator;

use crate::entities::{user, video};
use crate::migrations::Migrator;

/// Test database configuration, read from `TEST_DB_*` variables.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            host: var("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: var("TEST_DB_USER", "vidtube_test"),
            password: var("TEST_DB_PASSWORD", "vidtube_test"),
            database: var("TEST_DB_NAME", "vidtube_test"),
        }
    }
}

impl TestDbConfig {
    /// URL of the test database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the maintenance database used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// A freshly created and migrated database, dropped with [`Self::drop_database`].
pub struct TestDatabase {
    pub conn: Arc<DatabaseConnection>,
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a uniquely named database and run all migrations on it.
    pub async fn create() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("vidtube_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Created test database");
        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// A shared handle to the database connection, ready for repositories.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Drop the database. The pool is closed first when no other handle is
    /// still alive; `WITH (FORCE)` takes care of the rest.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        if let Ok(conn) = Arc::try_unwrap(self.conn) {
            conn.close().await?;
        }

        let admin = Database::connect(&self.config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }
}

/// Insert a user with the given username.
pub async fn insert_user(conn: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
    let now = Utc::now();
    user::ActiveModel {
        id: Set(IdGenerator::new().generate()),
        username: Set(username.to_lowercase()),
        email: Set(format!("{}@example.com", username.to_lowercase())),
        fullname: Set(username.to_string()),
        avatar_url: Set(format!("http://localhost/media/v1/avatars/{username}.png")),
        cover_image_url: Set(None),
        password_hash: Set("not-a-real-hash".to_string()),
        refresh_token: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await
}

/// Insert a published video owned by `owner_id`.
pub async fn insert_video(
    conn: &DatabaseConnection,
    owner_id: &str,
    views: i64,
) -> Result<video::Model, DbErr> {
    let now = Utc::now();
    let id = IdGenerator::new().generate();
    video::ActiveModel {
        id: Set(id.clone()),
        owner_id: Set(owner_id.to_string()),
        video_file_url: Set(format!("http://localhost/media/v1/videos/{id}.mp4")),
        thumbnail_url: Set(format!("http://localhost/media/v1/thumbnails/{id}.png")),
        title: Set(format!("Video {id}")),
        description: Set(String::new()),
        duration: Set(10.0),
        views: Set(views),
        is_published: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await
}
