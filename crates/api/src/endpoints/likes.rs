//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use vidtube_common::{AppError, AppResult, id::ensure_valid_id};
use vidtube_core::{ToggleState, like::toggle_message};
use vidtube_db::{read_model::VideoWithOwner, repositories::LikeKind};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Toggle result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub liked: bool,
}

/// Like count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountResponse {
    pub count: u64,
}

/// Map the `v`/`c`/`t` path segment to a like target kind.
fn parse_kind(segment: &str) -> AppResult<LikeKind> {
    match segment {
        "v" => Ok(LikeKind::Video),
        "c" => Ok(LikeKind::Comment),
        "t" => Ok(LikeKind::Tweet),
        other => Err(AppError::BadRequest(format!("Unknown like target: {other}"))),
    }
}

async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((kind, target_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<LikeToggleResponse>> {
    let kind = parse_kind(&kind)?;
    ensure_valid_id(&target_id, kind.label())?;

    let toggled = state.like_service.toggle(&user.id, kind, &target_id).await?;
    let status = match toggled {
        ToggleState::Added => StatusCode::CREATED,
        ToggleState::Removed => StatusCode::OK,
    };

    Ok(ApiResponse::with_status(
        status,
        LikeToggleResponse {
            liked: toggled.is_added(),
        },
        toggle_message(kind, toggled),
    ))
}

async fn like_count(
    State(state): State<AppState>,
    Path((kind, target_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<LikeCountResponse>> {
    let kind = parse_kind(&kind)?;
    ensure_valid_id(&target_id, kind.label())?;

    let count = state.like_service.count(kind, &target_id).await?;
    Ok(ApiResponse::ok(LikeCountResponse { count }, "Like count fetched successfully"))
}

async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoWithOwner>>> {
    let videos = state.like_service.liked_videos(&user.id).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/{kind}/{target_id}", post(toggle_like))
        .route("/count/{kind}/{target_id}", get(like_count))
        .route("/videos", get(liked_videos))
}
