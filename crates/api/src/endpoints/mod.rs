//! API endpoints.

mod comments;
mod dashboard;
mod healthcheck;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

use axum::{Router, http::HeaderValue, middleware};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{AppState, auth_middleware};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/healthcheck", healthcheck::router())
        .nest("/users", users::router())
        .nest("/videos", videos::router())
        .nest("/tweets", tweets::router())
        .nest("/comments", comments::router())
        .nest("/likes", likes::router())
        .nest("/playlist", playlists::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/dashboard", dashboard::router())
}

/// The complete application: `/api/v1` routes behind auth, tracing and CORS.
///
/// `cors_origin` of `None` (or an unparsable value) allows any origin.
pub fn app(state: AppState, cors_origin: Option<&str>) -> Router {
    let allow_origin = match cors_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Invalid CORS origin, allowing any");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    Router::new()
        .nest("/api/v1", router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
