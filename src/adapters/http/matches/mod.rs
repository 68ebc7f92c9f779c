//! Match endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MatchHandlers;
pub use routes::match_routes;
