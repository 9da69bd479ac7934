//! Comment endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use vidtube_common::{AppResult, id::ensure_valid_id};
use vidtube_core::CommentInput;
use vidtube_db::{
    entities::comment,
    read_model::{Page, VideoComment},
};

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

/// Page query.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

async fn video_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<VideoComment>>> {
    ensure_valid_id(&video_id, "Video")?;
    let comments = state
        .comment_service
        .list_for_video(&video_id, Page::new(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    ensure_valid_id(&video_id, "Video")?;
    let comment = state.comment_service.add(&user.id, &video_id, input).await?;
    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    ensure_valid_id(&comment_id, "Comment")?;
    let comment = state
        .comment_service
        .update(&user.id, &comment_id, input)
        .await?;
    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(&comment_id, "Comment")?;
    state.comment_service.delete(&user.id, &comment_id).await?;
    Ok(ApiResponse::ok((), "Comment deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{video_id}", get(video_comments).post(add_comment))
        .route("/c/{comment_id}", patch(update_comment).delete(delete_comment))
}
