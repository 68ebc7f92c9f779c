//! Admission port - yes/no verdict on whether traffic may proceed.
//!
//! Consulted once per HTTP request on the write endpoints and once per
//! new WebSocket connection attempt. The core only needs the decision
//! and a structured reason; how the policy reaches it (rate limiting,
//! bot detection) is an adapter concern.

use async_trait::async_trait;

/// The kind of traffic being admitted. HTTP and WebSocket connections
/// carry separate rate limit rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficKind {
    Http,
    Ws,
}

impl TrafficKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficKind::Http => "http",
            TrafficKind::Ws => "ws",
        }
    }
}

/// A connection or request presented for admission.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    /// Client IP, if the transport could determine one.
    pub ip: Option<String>,
    /// Which rule set applies.
    pub kind: TrafficKind,
}

impl AdmissionRequest {
    pub fn http(ip: Option<String>) -> Self {
        Self {
            ip,
            kind: TrafficKind::Http,
        }
    }

    pub fn ws(ip: Option<String>) -> Self {
        Self {
            ip,
            kind: TrafficKind::Ws,
        }
    }
}

/// Verdict on an admission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Traffic may proceed.
    Allow,
    /// Traffic is refused. `rate_limited` distinguishes "try again
    /// later" from a hard policy violation.
    Deny { rate_limited: bool },
}

impl AdmissionDecision {
    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, AdmissionDecision::Deny { .. })
    }
}

/// Port for admission decisions.
///
/// Implementations must be infallible from the caller's perspective:
/// an internal policy failure should fail open (`Allow`) rather than
/// refuse service.
#[async_trait]
pub trait AdmissionPolicy: Send + Sync {
    /// Decide whether the request may proceed.
    async fn decide(&self, request: &AdmissionRequest) -> AdmissionDecision;
}
