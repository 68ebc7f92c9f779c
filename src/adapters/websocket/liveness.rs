//! Liveness sweeper - periodic heartbeat over every connection.
//!
//! Each tick runs one registry sweep: connections that missed the
//! previous probe are evicted together with all their subscriptions,
//! survivors are probed again. The probe interval, response timeout,
//! and sweep period are the same knob - one missed round-trip means
//! eviction.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::registry::ConnectionRegistry;
use super::subscriptions::SubscriptionIndex;

/// Spawns the sweep loop. Aborted on shutdown.
pub fn spawn_sweeper(
    registry: Arc<ConnectionRegistry>,
    index: Arc<SubscriptionIndex>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // interval fires immediately; skip the startup tick so every
        // connection gets a full period before its first probe.
        tick.tick().await;

        loop {
            tick.tick().await;
            let evicted = registry.sweep().await;
            for conn_id in evicted {
                index.drop_connection(&conn_id).await;
                tracing::info!(conn_id = %conn_id, "evicted unresponsive connection");
            }
        }
    })
}
