//! Admission middleware for the HTTP API.
//!
//! Every API request passes the admission policy before reaching its
//! handler. Denials answer with the documented bodies: 429 for a rate
//! limit, 403 for a blocked client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::ports::{AdmissionDecision, AdmissionPolicy, AdmissionRequest};

use super::super::responses::ErrorResponse;

/// Admission middleware state.
pub type AdmissionState = Arc<dyn AdmissionPolicy>;

/// Checks the admission policy before running the inner handler.
pub async fn admission_middleware(
    State(policy): State<AdmissionState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip_from_parts(request.headers(), connect_info.as_ref());

    match policy.decide(&AdmissionRequest::http(ip)).await {
        AdmissionDecision::Allow => next.run(request).await,
        AdmissionDecision::Deny { rate_limited: true } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("Rate Limit exceeded")),
        )
            .into_response(),
        AdmissionDecision::Deny {
            rate_limited: false,
        } => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Forbidden")),
        )
            .into_response(),
    }
}

/// Resolves the client IP, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
pub fn client_ip_from_parts(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|h| h.to_str().ok()) {
        if let Some(first_ip) = forwarded.split(',').next() {
            return Some(first_ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}
