//! User and session endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use vidtube_common::{AppError, AppResult};
use vidtube_core::{
    ChangePasswordInput, LoginInput, LoginOutput, RegisterInput, TokenPair, UpdateAccountInput,
};
use vidtube_db::{
    entities::user,
    read_model::{ChannelProfile, VideoWithOwner},
};

use crate::{
    extractors::{AuthUser, JsonBody, MaybeAuthUser, MediaForm},
    middleware::AppState,
    response::ApiResponse,
};

/// Refresh token request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Register from a multipart form with an `avatar` and optional `coverImage`.
async fn register(
    State(state): State<AppState>,
    mut form: MediaForm,
) -> AppResult<ApiResponse<user::Model>> {
    let input = RegisterInput {
        username: form.required_text("username"),
        email: form.required_text("email"),
        fullname: form.required_text("fullname"),
        password: form.required_text("password"),
    };
    let avatar = form.file("avatar");
    let cover_image = form.file("coverImage");

    let user = state
        .user_service
        .register(input, avatar, cover_image)
        .await?;

    Ok(ApiResponse::created(user, "User registered successfully"))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> AppResult<ApiResponse<LoginOutput>> {
    let output = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(output, "User logged in successfully"))
}

async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.logout(&user.id).await?;
    Ok(ApiResponse::ok((), "User logged out"))
}

async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> AppResult<ApiResponse<TokenPair>> {
    let tokens = state.user_service.refresh(&req.refresh_token).await?;
    Ok(ApiResponse::ok(tokens, "Access token refreshed"))
}

async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ChangePasswordInput>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.change_password(&user.id, input).await?;
    Ok(ApiResponse::ok((), "Password changed successfully"))
}

async fn current_user(AuthUser(user): AuthUser) -> AppResult<ApiResponse<user::Model>> {
    Ok(ApiResponse::ok(user, "Current user fetched successfully"))
}

async fn update_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UpdateAccountInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.update_account(&user.id, input).await?;
    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

async fn update_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: MediaForm,
) -> AppResult<ApiResponse<user::Model>> {
    let avatar = form
        .file("avatar")
        .ok_or_else(|| AppError::BadRequest("Avatar file is missing".to_string()))?;
    let user = state.user_service.update_avatar(&user.id, avatar).await?;
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

async fn update_cover_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut form: MediaForm,
) -> AppResult<ApiResponse<user::Model>> {
    let cover = form
        .file("coverImage")
        .ok_or_else(|| AppError::BadRequest("Cover image file is missing".to_string()))?;
    let user = state.user_service.update_cover_image(&user.id, cover).await?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

async fn channel_profile(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ChannelProfile>> {
    let profile = state.channel_service.profile(&username, viewer.id()).await?;
    Ok(ApiResponse::ok(profile, "User channel fetched successfully"))
}

async fn watch_history(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoWithOwner>>> {
    let history = state.channel_service.watch_history(&user.id).await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/change-password", post(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .route("/c/{username}", get(channel_profile))
        .route("/history", get(watch_history))
}
