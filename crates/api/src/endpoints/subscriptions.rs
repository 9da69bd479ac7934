//! Subscription endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use vidtube_common::{AppResult, id::ensure_valid_id};
use vidtube_core::subscription::toggle_message;
use vidtube_db::read_model::UserSummary;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Toggle result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggleResponse {
    pub subscribed: bool,
}

async fn toggle_subscription(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<SubscriptionToggleResponse>> {
    ensure_valid_id(&channel_id, "Channel")?;

    let toggled = state
        .subscription_service
        .toggle(&user.id, &channel_id)
        .await?;

    Ok(ApiResponse::ok(
        SubscriptionToggleResponse {
            subscribed: toggled.is_added(),
        },
        toggle_message(toggled),
    ))
}

async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserSummary>>> {
    ensure_valid_id(&channel_id, "Channel")?;
    let subscribers = state
        .subscription_service
        .channel_subscribers(&channel_id)
        .await?;
    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserSummary>>> {
    ensure_valid_id(&subscriber_id, "Subscriber")?;
    let channels = state
        .subscription_service
        .subscribed_channels(&subscriber_id)
        .await?;
    Ok(ApiResponse::ok(channels, "Subscribed channels fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/c/{channel_id}",
            get(channel_subscribers).post(toggle_subscription),
        )
        .route("/u/{subscriber_id}", get(subscribed_channels))
}
