//! Broadcast dispatcher - relays committed domain events to viewers.
//!
//! Only invoked after the corresponding persistence write succeeded;
//! the dispatcher never originates data. Delivery is best-effort per
//! recipient: a closed connection is logged and skipped, the remaining
//! targets still receive the event, and nothing is surfaced to the
//! producing request handler.

use std::sync::Arc;

use crate::domain::commentary::Commentary;
use crate::domain::matches::Match;

use super::messages::ServerMessage;
use super::registry::{ConnectionRegistry, OutboundFrame};
use super::subscriptions::SubscriptionIndex;

/// Fans committed events out to the interested connection set.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    index: Arc<SubscriptionIndex>,
}

impl Broadcaster {
    /// Create a broadcaster over the shared registry and index.
    pub fn new(registry: Arc<ConnectionRegistry>, index: Arc<SubscriptionIndex>) -> Self {
        Self { registry, index }
    }

    /// Announces a created match to every registered connection.
    ///
    /// Match creation is a global announcement; no subscription filter.
    pub async fn broadcast_match_created(&self, match_row: &Match) {
        let frame = ServerMessage::MatchCreated {
            data: match_row.clone(),
        }
        .to_json();

        let mut delivered = 0usize;
        for (conn_id, tx) in self.registry.senders().await {
            if tx.send(OutboundFrame::Text(frame.clone())).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(conn_id = %conn_id, "skipping closed connection during match broadcast");
            }
        }

        tracing::debug!(match_id = match_row.id, delivered, "broadcast match.created");
    }

    /// Delivers commentary to the current subscribers of its match.
    pub async fn broadcast_commentary(&self, match_id: i64, comment: &Commentary) {
        let targets = self.index.subscribers_of(match_id).await;
        if targets.is_empty() {
            return;
        }

        // Serialize once; every recipient gets identical bytes.
        let frame = ServerMessage::Commentary {
            data: comment.clone(),
        }
        .to_json();

        let mut delivered = 0usize;
        for conn_id in targets {
            if self
                .registry
                .send_to(&conn_id, OutboundFrame::Text(frame.clone()))
                .await
            {
                delivered += 1;
            } else {
                tracing::debug!(conn_id = %conn_id, match_id, "skipping closed connection during commentary broadcast");
            }
        }

        tracing::debug!(match_id, delivered, "broadcast commentary");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::sync::mpsc;

    use crate::domain::matches::MatchStatus;

    use super::super::registry::ConnectionId;

    fn test_match(id: i64) -> Match {
        Match {
            id,
            sport: "football".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            status: MatchStatus::Live,
            start_time: None,
            end_time: None,
            home_score: 1,
            away_score: 0,
            created_at: Utc::now(),
        }
    }

    fn test_commentary(match_id: i64) -> Commentary {
        Commentary {
            id: 1,
            match_id,
            minute: Some(23),
            sequence: None,
            period: None,
            event_type: Some("goal".to_string()),
            actor: None,
            team: None,
            message: "Goal!".to_string(),
            metadata: None,
            tags: None,
            created_at: Utc::now(),
        }
    }

    async fn connect(
        registry: &ConnectionRegistry,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        registry.register(id, tx).await;
        (id, rx)
    }

    fn text_of(frame: OutboundFrame) -> String {
        match frame {
            OutboundFrame::Text(text) => text,
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn match_created_reaches_every_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (_a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;
        // Subscriptions are irrelevant to match.created.
        index.subscribe(7, b).await;

        broadcaster.broadcast_match_created(&test_match(42)).await;

        for rx in [&mut rx_a, &mut rx_b] {
            let text = text_of(rx.recv().await.unwrap());
            assert!(text.contains(r#""type":"match.created""#));
            assert!(text.contains(r#""id":42"#));
        }
    }

    #[tokio::test]
    async fn commentary_reaches_only_subscribers() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;
        index.subscribe(42, a).await;
        index.subscribe(7, b).await;

        broadcaster
            .broadcast_commentary(42, &test_commentary(42))
            .await;

        let text = text_of(rx_a.recv().await.unwrap());
        assert!(text.contains(r#""type":"commentary""#));
        assert!(text.contains(r#""matchId":42"#));

        // B subscribed to a different match; its queue must stay empty.
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn identical_bytes_to_every_recipient() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (a, mut rx_a) = connect(&registry).await;
        let (b, mut rx_b) = connect(&registry).await;
        index.subscribe(42, a).await;
        index.subscribe(42, b).await;

        broadcaster
            .broadcast_commentary(42, &test_commentary(42))
            .await;

        assert_eq!(
            text_of(rx_a.recv().await.unwrap()),
            text_of(rx_b.recv().await.unwrap())
        );
    }

    #[tokio::test]
    async fn dead_recipient_does_not_abort_fanout() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (dead, rx_dead) = connect(&registry).await;
        let (live, mut rx_live) = connect(&registry).await;
        index.subscribe(42, dead).await;
        index.subscribe(42, live).await;
        drop(rx_dead);

        broadcaster
            .broadcast_commentary(42, &test_commentary(42))
            .await;

        assert!(rx_live.recv().await.is_some());
    }

    #[tokio::test]
    async fn commentary_without_subscribers_is_noop() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (_a, mut rx_a) = connect(&registry).await;

        broadcaster
            .broadcast_commentary(42, &test_commentary(42))
            .await;

        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn events_arrive_in_commit_order() {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new());
        let broadcaster = Broadcaster::new(registry.clone(), index.clone());

        let (a, mut rx_a) = connect(&registry).await;
        index.subscribe(42, a).await;

        broadcaster
            .broadcast_commentary(42, &test_commentary(42))
            .await;
        broadcaster.broadcast_match_created(&test_match(43)).await;

        assert!(text_of(rx_a.recv().await.unwrap()).contains(r#""type":"commentary""#));
        assert!(text_of(rx_a.recv().await.unwrap()).contains(r#""type":"match.created""#));
    }
}
