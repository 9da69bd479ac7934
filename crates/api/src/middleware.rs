//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use vidtube_core::{
    ChannelService, CommentService, LikeService, PlaylistService, SubscriptionService,
    TweetService, UserService, VideoService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub video_service: VideoService,
    pub tweet_service: TweetService,
    pub comment_service: CommentService,
    pub like_service: LikeService,
    pub subscription_service: SubscriptionService,
    pub playlist_service: PlaylistService,
    pub channel_service: ChannelService,
}

/// Authentication middleware.
///
/// A valid `Authorization: Bearer <access token>` puts the user into the
/// request extensions. Anything else passes through unauthenticated and is
/// rejected by [`crate::extractors::AuthUser`] where a user is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_access_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid access token");
            }
        }
    }

    next.run(req).await
}
