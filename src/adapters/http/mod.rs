//! HTTP adapter - REST surface over the application layer.

pub mod commentary;
pub mod matches;
pub mod middleware;
pub mod responses;

use axum::{http::StatusCode, response::IntoResponse, Json};

pub use responses::{DataResponse, ErrorResponse};

/// GET /health - liveness probe.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
