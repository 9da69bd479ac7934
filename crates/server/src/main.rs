//! vidtube-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tokio::signal;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidtube_api::{app, middleware::AppState};
use vidtube_common::{Config, LocalMediaStorage, SharedMediaStorage};
use vidtube_core::{
    ChannelService, CommentService, LikeService, PlaylistService, SubscriptionService,
    TokenService, TweetService, UserService, VideoService,
};
use vidtube_db::{
    read_model::ReadModel,
    repositories::{
        CommentRepository, LikeRepository, PlaylistRepository, SubscriptionRepository,
        TweetRepository, UserRepository, VideoRepository, WatchHistoryRepository,
    },
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidtube=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting vidtube-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = Arc::new(vidtube_db::init(&config).await?);
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    vidtube_db::migrate(&db).await?;
    info!("Migrations completed");

    // Media storage
    let media: SharedMediaStorage = Arc::new(LocalMediaStorage::new(
        config.media.base_path.clone(),
        config.media.base_url.clone(),
    ));

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let tweet_repo = TweetRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
    let playlist_repo = PlaylistRepository::new(Arc::clone(&db));
    let history_repo = WatchHistoryRepository::new(Arc::clone(&db));
    let read_model = ReadModel::new(Arc::clone(&db));

    // Initialize services
    let state = AppState {
        user_service: UserService::new(
            user_repo.clone(),
            TokenService::new(&config.auth),
            media.clone(),
        ),
        video_service: VideoService::new(video_repo.clone(), history_repo, media),
        tweet_service: TweetService::new(tweet_repo.clone(), user_repo.clone()),
        comment_service: CommentService::new(
            comment_repo.clone(),
            video_repo.clone(),
            read_model.clone(),
        ),
        like_service: LikeService::new(
            like_repo,
            video_repo.clone(),
            comment_repo,
            tweet_repo,
            read_model.clone(),
        ),
        subscription_service: SubscriptionService::new(
            subscription_repo,
            user_repo,
            read_model.clone(),
        ),
        playlist_service: PlaylistService::new(playlist_repo, video_repo, read_model.clone()),
        channel_service: ChannelService::new(read_model),
    };

    // Build router. Media URLs carry a `v<timestamp>` segment that is not
    // part of the on-disk path.
    let media_mount = format!("{}/{{version}}", config.media.mount_path());
    let router = app(state, config.server.cors_origin.as_deref())
        .nest_service(&media_mount, ServeDir::new(&config.media.base_path))
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes));

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
