//! Fixed-window admission policy backed by an in-memory map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{AdmissionDecision, AdmissionPolicy, AdmissionRequest, TrafficKind};

use super::config::{AdmissionConfig, AdmissionRule};

/// Every this many decisions, expired windows are dropped from the map.
const PRUNE_INTERVAL: u64 = 1024;

/// State for a single counting window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Requests seen in the current window.
    count: u32,
    /// When the current window started, unix seconds.
    window_start: u64,
    /// Window length for this entry's traffic kind, seconds.
    window_secs: u32,
}

impl WindowState {
    fn expired(&self, now: u64) -> bool {
        now >= self.window_start + self.window_secs as u64
    }
}

/// In-memory admission policy.
///
/// Counts per (traffic kind, client IP) pair in fixed windows. A
/// request without a resolvable IP is admitted; denying it would take
/// the whole service down behind a misconfigured proxy.
#[derive(Debug)]
pub struct InMemoryAdmission {
    config: AdmissionConfig,
    windows: RwLock<HashMap<String, WindowState>>,
    decisions: AtomicU64,
}

impl InMemoryAdmission {
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
            decisions: AtomicU64::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AdmissionConfig::default())
    }

    fn rule_for(&self, kind: TrafficKind) -> &AdmissionRule {
        match kind {
            TrafficKind::Http => &self.config.http,
            TrafficKind::Ws => &self.config.ws,
        }
    }

    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }
}

#[async_trait]
impl AdmissionPolicy for InMemoryAdmission {
    async fn decide(&self, request: &AdmissionRequest) -> AdmissionDecision {
        let Some(ip) = request.ip.as_deref() else {
            return AdmissionDecision::Allow;
        };

        if self.config.blocked_ips.iter().any(|blocked| blocked == ip) {
            tracing::warn!(ip, kind = request.kind.as_str(), "blocked IP denied");
            return AdmissionDecision::Deny {
                rate_limited: false,
            };
        }

        let rule = self.rule_for(request.kind);
        let key = format!("{}:{}", request.kind.as_str(), ip);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        // Expired entries would otherwise pile up one per churned IP.
        if self.decisions.fetch_add(1, Ordering::Relaxed) % PRUNE_INTERVAL == PRUNE_INTERVAL - 1 {
            windows.retain(|_, state| !state.expired(now));
        }

        let state = windows.entry(key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs: rule.window_secs,
        });

        // Reset an expired window before counting.
        if state.expired(now) {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= rule.max_requests {
            tracing::warn!(
                ip,
                kind = request.kind.as_str(),
                limit = rule.max_requests,
                "rate limit exceeded"
            );
            return AdmissionDecision::Deny { rate_limited: true };
        }

        state.count += 1;
        AdmissionDecision::Allow
    }
}
