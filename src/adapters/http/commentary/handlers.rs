//! HTTP handlers for commentary endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{ListCommentaryHandler, PostCommentaryHandler};

use super::super::matches::dto::ListQuery;
use super::super::responses::{domain_error_response, DataResponse};
use super::dto::PostCommentaryRequest;

#[derive(Clone)]
pub struct CommentaryHandlers {
    pub post: PostCommentaryHandler,
    pub list: ListCommentaryHandler,
}

impl CommentaryHandlers {
    pub fn new(post: PostCommentaryHandler, list: ListCommentaryHandler) -> Self {
        Self { post, list }
    }
}

/// POST /matches/:id/commentary - post commentary to a match.
pub async fn post_commentary(
    State(handlers): State<CommentaryHandlers>,
    Path(match_id): Path<i64>,
    Json(req): Json<PostCommentaryRequest>,
) -> Response {
    match handlers.post.handle(match_id, req.into()).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(DataResponse::new("Commentary Created Successfully", row)),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /matches/:id/commentary - list the newest commentary.
pub async fn list_commentary(
    State(handlers): State<CommentaryHandlers>,
    Path(match_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Response {
    match handlers.list.handle(match_id, query.limit).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(DataResponse::new("Commentary Fetched Successfully", rows)),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
