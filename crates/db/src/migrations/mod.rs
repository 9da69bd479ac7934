//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_video_table;
mod m20250101_000003_create_tweet_table;
mod m20250101_000004_create_comment_table;
mod m20250101_000005_create_like_table;
mod m20250101_000006_create_playlist_table;
mod m20250101_000007_create_subscription_table;
mod m20250101_000008_create_watch_history_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_video_table::Migration),
            Box::new(m20250101_000003_create_tweet_table::Migration),
            Box::new(m20250101_000004_create_comment_table::Migration),
            Box::new(m20250101_000005_create_like_table::Migration),
            Box::new(m20250101_000006_create_playlist_table::Migration),
            Box::new(m20250101_000007_create_subscription_table::Migration),
            Box::new(m20250101_000008_create_watch_history_table::Migration),
        ]
    }
}
