//! In-memory admission policy.
//!
//! Fixed-window counting per traffic kind and client IP, plus a static
//! IP denylist. Suitable for single-server deployments; a multi-server
//! setup would back the same port with a shared store.

mod config;
mod in_memory;

pub use config::{AdmissionConfig, AdmissionRule};
pub use in_memory::InMemoryAdmission;
