//! HTTP API layer for vidtube-rs.
//!
//! - **Endpoints**: users, videos, tweets, comments, likes, playlists,
//!   subscriptions and the channel dashboard under `/api/v1`
//! - **Extractors**: authentication, JSON and multipart bodies
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{app, router};
