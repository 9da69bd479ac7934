//! Channel dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use vidtube_common::AppResult;
use vidtube_db::read_model::{ChannelStats, VideoWithOwner};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelStats>> {
    let stats = state.channel_service.stats(&user.id).await?;
    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

async fn videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoWithOwner>>> {
    let videos = state.channel_service.videos(&user.id).await?;
    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/videos", get(videos))
}
