//! HTTP routes for commentary endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_commentary, post_commentary, CommentaryHandlers};

/// Creates the commentary router.
pub fn commentary_routes(handlers: CommentaryHandlers) -> Router {
    Router::new()
        .route("/matches/:id/commentary", post(post_commentary))
        .route("/matches/:id/commentary", get(list_commentary))
        .with_state(handlers)
}
