//! HTTP handlers for match endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{CreateMatchHandler, ListMatchesHandler};

use super::super::responses::{domain_error_response, DataResponse};
use super::dto::{CreateMatchRequest, ListQuery};

#[derive(Clone)]
pub struct MatchHandlers {
    pub create: CreateMatchHandler,
    pub list: ListMatchesHandler,
}

impl MatchHandlers {
    pub fn new(create: CreateMatchHandler, list: ListMatchesHandler) -> Self {
        Self { create, list }
    }
}

/// POST /matches - create a match and announce it.
pub async fn create_match(
    State(handlers): State<MatchHandlers>,
    Json(req): Json<CreateMatchRequest>,
) -> Response {
    match handlers.create.handle(req.into()).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(DataResponse::new("Match Created Successfully", row)),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /matches - list the newest matches.
pub async fn list_matches(
    State(handlers): State<MatchHandlers>,
    Query(query): Query<ListQuery>,
) -> Response {
    match handlers.list.handle(query.limit).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(DataResponse::new("Matches Fetched Successfully", rows)),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
