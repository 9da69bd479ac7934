//! Health check endpoint.

use axum::{Router, routing::get};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

async fn healthcheck() -> ApiResponse<Health> {
    ApiResponse::ok(Health { status: "OK" }, "Everything is running")
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(healthcheck))
}
