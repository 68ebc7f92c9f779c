//! Shared HTTP response shapes and domain error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Success envelope: a human-readable message plus the payload.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Maps a domain error onto an HTTP response.
///
/// Infrastructure failures are logged server-side and reported with a
/// generic body; their messages never reach the client.
pub fn domain_error_response(err: DomainError) -> Response {
    let status = match err.code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::MatchNotFound => StatusCode::NOT_FOUND,
        ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = if status.is_server_error() {
        tracing::error!(code = %err.code, "request failed: {}", err.message);
        ErrorResponse::new("Internal Server Error")
    } else {
        ErrorResponse::new(err.message)
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = DomainError::new(ErrorCode::MatchNotFound, "Match not found: 42");
        let response = domain_error_response(err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "bad input");
        let response = domain_error_response(err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_maps_to_500() {
        let err = DomainError::new(ErrorCode::DatabaseError, "connection refused");
        let response = domain_error_response(err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_serializes_with_error_key() {
        let body = serde_json::to_string(&ErrorResponse::new("Forbidden")).unwrap();
        assert_eq!(body, r#"{"error":"Forbidden"}"#);
    }

    #[test]
    fn data_response_wraps_payload() {
        let body =
            serde_json::to_string(&DataResponse::new("Matches Fetched Successfully", vec![1, 2]))
                .unwrap();
        assert!(body.contains(r#""message":"Matches Fetched Successfully""#));
        assert!(body.contains(r#""data":[1,2]"#));
    }
}
