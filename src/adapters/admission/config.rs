//! Admission policy configuration.

use serde::Deserialize;

/// One fixed-window rule.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionRule {
    /// Maximum requests allowed per window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_secs: u32,
}

impl AdmissionRule {
    pub fn new(max_requests: u32, window_secs: u32) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Configuration for the admission policy.
///
/// HTTP and WebSocket traffic get separate budgets: connection
/// attempts are far rarer than API calls, so the WebSocket window is
/// much tighter.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionConfig {
    /// Rule applied to HTTP API requests.
    pub http: AdmissionRule,
    /// Rule applied to WebSocket connection attempts.
    pub ws: AdmissionRule,
    /// IPs denied outright, never rate-counted.
    #[serde(default)]
    pub blocked_ips: Vec<String>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            http: AdmissionRule::new(50, 10),
            ws: AdmissionRule::new(5, 2),
            blocked_ips: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_budget_is_wider_than_ws() {
        let config = AdmissionConfig::default();
        assert_eq!(config.http.max_requests, 50);
        assert_eq!(config.http.window_secs, 10);
        assert_eq!(config.ws.max_requests, 5);
        assert_eq!(config.ws.window_secs, 2);
        assert!(config.blocked_ips.is_empty());
    }
}
