//! Commentary endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::CommentaryHandlers;
pub use routes::commentary_routes;
