//! Tweet endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidtube_common::{AppResult, id::ensure_valid_id};
use vidtube_core::TweetInput;
use vidtube_db::entities::tweet;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<TweetInput>,
) -> AppResult<ApiResponse<tweet::Model>> {
    let tweet = state.tweet_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<tweet::Model>>> {
    ensure_valid_id(&user_id, "User")?;
    let tweets = state.tweet_service.list_by_owner(&user_id).await?;
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

async fn update_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    JsonBody(input): JsonBody<TweetInput>,
) -> AppResult<ApiResponse<tweet::Model>> {
    ensure_valid_id(&tweet_id, "Tweet")?;
    let tweet = state.tweet_service.update(&user.id, &tweet_id, input).await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(&tweet_id, "Tweet")?;
    state.tweet_service.delete(&user.id, &tweet_id).await?;
    Ok(ApiResponse::ok((), "Tweet deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/{user_id}", get(user_tweets))
        .route("/{tweet_id}", patch(update_tweet).delete(delete_tweet))
}
