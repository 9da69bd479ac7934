//! Video endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidtube_common::{AppResult, id::ensure_valid_id};
use vidtube_core::{PublishVideoInput, UpdateVideoInput};
use vidtube_db::entities::video;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, MediaForm},
    middleware::AppState,
    response::ApiResponse,
};

/// Publish from a multipart form with `videoFile` and `thumbnail`.
async fn publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: MediaForm,
) -> AppResult<ApiResponse<video::Model>> {
    let input = PublishVideoInput {
        title: form.required_text("title"),
        description: form.required_text("description"),
    };
    let video_file = form.file("videoFile");
    let thumbnail = form.file("thumbnail");

    let video = state
        .video_service
        .publish(&user.id, input, video_file, thumbnail)
        .await?;

    Ok(ApiResponse::created(video, "Video published successfully"))
}

async fn list_by_owner(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<video::Model>>> {
    ensure_valid_id(&user_id, "User")?;
    let videos = state
        .video_service
        .list_by_owner(&user_id, viewer.id())
        .await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

async fn get_video(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<video::Model>> {
    ensure_valid_id(&video_id, "Video")?;
    let video = state.video_service.get_by_id(&video_id, viewer.id()).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// Update from a multipart form; every part is optional.
async fn update_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    mut form: MediaForm,
) -> AppResult<ApiResponse<video::Model>> {
    ensure_valid_id(&video_id, "Video")?;

    let input = UpdateVideoInput {
        title: form.text("title"),
        description: form.text("description"),
    };
    let thumbnail = form.file("thumbnail");

    let video = state
        .video_service
        .update(&user.id, &video_id, input, thumbnail)
        .await?;
    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

async fn delete_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(&video_id, "Video")?;
    state.video_service.delete(&user.id, &video_id).await?;
    Ok(ApiResponse::ok((), "Video deleted successfully"))
}

async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<video::Model>> {
    ensure_valid_id(&video_id, "Video")?;
    let video = state.video_service.toggle_publish(&user.id, &video_id).await?;
    Ok(ApiResponse::ok(video, "Publish status toggled successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(publish))
        .route("/user/{user_id}", get(list_by_owner))
        .route(
            "/{video_id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/toggle/publish/{video_id}", patch(toggle_publish))
}
