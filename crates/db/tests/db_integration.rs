//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `vidtube_test`)
//!   `TEST_DB_PASSWORD` (default: `vidtube_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use vidtube_common::IdGenerator;
use vidtube_db::entities::{Like, PlaylistVideo, like, playlist, playlist_video};
use vidtube_db::read_model::ReadModel;
use vidtube_db::repositories::{LikeKind, LikeRepository, PlaylistRepository, SubscriptionRepository};
use vidtube_db::test_utils::{TestDatabase, TestDbConfig, insert_user, insert_video};

fn id() -> String {
    IdGenerator::new().generate()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_uniqueness_is_enforced() {
    let db = TestDatabase::create().await.expect("Failed to create database");
    let conn = db.connection();

    let alice = insert_user(&conn, "alice").await.unwrap();
    let bob = insert_user(&conn, "bob").await.unwrap();
    let video = insert_video(&conn, &alice.id, 0).await.unwrap();

    let likes = LikeRepository::new(Arc::clone(&conn));
    assert!(likes.insert_if_absent(id(), &bob.id, LikeKind::Video, &video.id).await.unwrap());
    assert!(!likes.insert_if_absent(id(), &bob.id, LikeKind::Video, &video.id).await.unwrap());

    let count = Like::find()
        .filter(like::Column::VideoId.eq(video.id.clone()))
        .count(conn.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 1);

    assert_eq!(likes.remove(&bob.id, LikeKind::Video, &video.id).await.unwrap(), 1);
    assert_eq!(likes.count_for(LikeKind::Video, &video.id).await.unwrap(), 0);

    drop(likes);
    drop(conn);
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_playlist_set_semantics() {
    let db = TestDatabase::create().await.expect("Failed to create database");
    let conn = db.connection();

    let alice = insert_user(&conn, "alice").await.unwrap();
    let video = insert_video(&conn, &alice.id, 0).await.unwrap();

    let playlists = PlaylistRepository::new(Arc::clone(&conn));
    let now = chrono::Utc::now();
    let list = playlists
        .create(playlist::ActiveModel {
            id: sea_orm::Set(id()),
            owner_id: sea_orm::Set(alice.id.clone()),
            name: sea_orm::Set("Later".to_string()),
            description: sea_orm::Set("Watch later".to_string()),
            created_at: sea_orm::Set(now.into()),
            updated_at: sea_orm::Set(now.into()),
        })
        .await
        .unwrap();

    assert!(playlists.add_video(id(), &list.id, &video.id).await.unwrap());
    assert!(!playlists.add_video(id(), &list.id, &video.id).await.unwrap());

    let members = PlaylistVideo::find()
        .filter(playlist_video::Column::PlaylistId.eq(list.id.clone()))
        .count(conn.as_ref())
        .await
        .unwrap();
    assert_eq!(members, 1);

    assert!(playlists.remove_video(&list.id, &video.id).await.unwrap());
    assert!(!playlists.remove_video(&list.id, &video.id).await.unwrap());

    drop(playlists);
    drop(conn);
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_channel_profile_counts() {
    let db = TestDatabase::create().await.expect("Failed to create database");
    let conn = db.connection();

    let alice = insert_user(&conn, "alice").await.unwrap();
    let subscriptions = SubscriptionRepository::new(Arc::clone(&conn));
    for name in ["bob", "carol", "dave"] {
        let fan = insert_user(&conn, name).await.unwrap();
        subscriptions.insert_if_absent(id(), &fan.id, &alice.id).await.unwrap();
    }
    let viewer = insert_user(&conn, "erin").await.unwrap();

    let read_model = ReadModel::new(Arc::clone(&conn));
    let profile = read_model
        .channel_profile("ALICE", Some(&viewer.id))
        .await
        .unwrap()
        .expect("profile");

    assert_eq!(profile.subscribers_count, 3);
    assert_eq!(profile.channels_subscribed_to_count, 0);
    assert!(!profile.is_subscribed);

    insert_video(&conn, &alice.id, 5).await.unwrap();
    insert_video(&conn, &alice.id, 7).await.unwrap();
    let stats = read_model.channel_stats(&alice.id).await.unwrap();
    assert_eq!(stats.total_videos, 2);
    assert_eq!(stats.total_views, 12);
    assert_eq!(stats.total_likes, 0);

    drop(read_model);
    drop(subscriptions);
    drop(conn);
    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
