//! Playlist endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Serialize;
use vidtube_common::{AppResult, id::ensure_valid_id};
use vidtube_core::{CreatePlaylistInput, MembershipChange, UpdatePlaylistInput};
use vidtube_db::{entities::playlist, read_model::PlaylistWithVideos};

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

/// Membership change result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub playlist_id: String,
    pub video_id: String,
    pub change: MembershipChange,
}

async fn create_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreatePlaylistInput>,
) -> AppResult<ApiResponse<playlist::Model>> {
    let playlist = state.playlist_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<playlist::Model>>> {
    ensure_valid_id(&user_id, "User")?;
    let playlists = state.playlist_service.list_by_owner(&user_id).await?;
    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PlaylistWithVideos>> {
    ensure_valid_id(&playlist_id, "Playlist")?;
    let playlist = state.playlist_service.get_with_videos(&playlist_id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

async fn update_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    JsonBody(input): JsonBody<UpdatePlaylistInput>,
) -> AppResult<ApiResponse<playlist::Model>> {
    ensure_valid_id(&playlist_id, "Playlist")?;
    let playlist = state
        .playlist_service
        .update(&user.id, &playlist_id, input)
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

async fn delete_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(&playlist_id, "Playlist")?;
    state.playlist_service.delete(&user.id, &playlist_id).await?;
    Ok(ApiResponse::ok((), "Playlist deleted successfully"))
}

async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<MembershipResponse>> {
    ensure_valid_id(&video_id, "Video")?;
    ensure_valid_id(&playlist_id, "Playlist")?;

    let change = state
        .playlist_service
        .add_video(&user.id, &playlist_id, &video_id)
        .await?;

    Ok(ApiResponse::ok(
        MembershipResponse {
            playlist_id,
            video_id,
            change,
        },
        change.message(),
    ))
}

async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<MembershipResponse>> {
    ensure_valid_id(&video_id, "Video")?;
    ensure_valid_id(&playlist_id, "Playlist")?;

    let change = state
        .playlist_service
        .remove_video(&user.id, &playlist_id, &video_id)
        .await?;

    Ok(ApiResponse::ok(
        MembershipResponse {
            playlist_id,
            video_id,
            change,
        },
        change.message(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{user_id}", get(user_playlists))
        .route(
            "/{playlist_id}",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route("/add/{video_id}/{playlist_id}", patch(add_video))
        .route("/remove/{video_id}/{playlist_id}", patch(remove_video))
}
