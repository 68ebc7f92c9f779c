//! Ports - trait seams between the core and its collaborators.
//!
//! The real-time core only learns of committed domain objects through
//! [`MatchStore`], and only admits traffic the [`AdmissionPolicy`]
//! allows. Both are implemented by adapters.

mod admission;
mod match_store;

pub use admission::{AdmissionDecision, AdmissionPolicy, AdmissionRequest, TrafficKind};
pub use match_store::MatchStore;
