//! HTTP routes for match endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_match, list_matches, MatchHandlers};

/// Creates the match router.
pub fn match_routes(handlers: MatchHandlers) -> Router {
    Router::new()
        .route("/matches", post(create_match))
        .route("/matches", get(list_matches))
        .with_state(handlers)
}
