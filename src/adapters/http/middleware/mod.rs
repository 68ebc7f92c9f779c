//! HTTP middleware.

mod admission;

pub use admission::{admission_middleware, client_ip_from_parts};
