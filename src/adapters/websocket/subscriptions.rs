//! Subscription index - which connections follow which matches.
//!
//! Bidirectional: match → connections for computing broadcast targets,
//! connection → matches for O(1) cleanup on disconnect. Both maps live
//! under one lock so a reader never observes them disagreeing, and
//! `drop_connection` is a single logical step.
//!
//! Per-match sets that become empty are deleted outright, so the index
//! only ever holds entries for matches someone is actually watching.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::registry::ConnectionId;

#[derive(Default)]
struct IndexInner {
    by_match: HashMap<i64, HashSet<ConnectionId>>,
    by_connection: HashMap<ConnectionId, HashSet<i64>>,
}

/// Index of live subscriptions.
///
/// Accepts any integer match ID; a subscription to a match that does
/// not exist in the store simply never receives a broadcast.
pub struct SubscriptionIndex {
    inner: RwLock<IndexInner>,
}

impl SubscriptionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexInner::default()),
        }
    }

    /// Subscribes a connection to a match. Idempotent.
    pub async fn subscribe(&self, match_id: i64, connection: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.by_match.entry(match_id).or_default().insert(connection);
        inner
            .by_connection
            .entry(connection)
            .or_default()
            .insert(match_id);
    }

    /// Removes a subscription in both directions.
    ///
    /// A no-op if the connection never subscribed to the match. Deletes
    /// the per-match entry when its set becomes empty.
    pub async fn unsubscribe(&self, match_id: i64, connection: &ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(subscribers) = inner.by_match.get_mut(&match_id) {
            subscribers.remove(connection);
            if subscribers.is_empty() {
                inner.by_match.remove(&match_id);
            }
        }

        if let Some(matches) = inner.by_connection.get_mut(connection) {
            matches.remove(&match_id);
            if matches.is_empty() {
                inner.by_connection.remove(connection);
            }
        }
    }

    /// Current subscribers of a match (possibly empty).
    pub async fn subscribers_of(&self, match_id: i64) -> Vec<ConnectionId> {
        let inner = self.inner.read().await;
        inner
            .by_match
            .get(&match_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Removes a connection from every match set it belongs to.
    ///
    /// Used by eviction and close; holds the write lock for the whole
    /// removal so no partial state is observable.
    pub async fn drop_connection(&self, connection: &ConnectionId) {
        let mut inner = self.inner.write().await;

        let Some(matches) = inner.by_connection.remove(connection) else {
            return;
        };

        for match_id in matches {
            if let Some(subscribers) = inner.by_match.get_mut(&match_id) {
                subscribers.remove(connection);
                if subscribers.is_empty() {
                    inner.by_match.remove(&match_id);
                }
            }
        }
    }

    /// Number of matches with at least one subscriber.
    pub async fn match_count(&self) -> usize {
        self.inner.read().await.by_match.len()
    }

    /// Number of connections holding at least one subscription.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.by_connection.len()
    }

    /// True if the index holds no subscriptions at all.
    pub async fn is_empty(&self) -> bool {
        let inner = self.inner.read().await;
        inner.by_match.is_empty() && inner.by_connection.is_empty()
    }
}

impl Default for SubscriptionIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_then_unsubscribe_leaves_no_trace() {
        let index = SubscriptionIndex::new();
        let conn = ConnectionId::new();

        index.subscribe(42, conn).await;
        assert_eq!(index.subscribers_of(42).await, vec![conn]);

        index.unsubscribe(42, &conn).await;
        assert!(index.subscribers_of(42).await.is_empty());
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn subscribing_twice_is_idempotent() {
        let index = SubscriptionIndex::new();
        let conn = ConnectionId::new();

        index.subscribe(42, conn).await;
        index.subscribe(42, conn).await;

        assert_eq!(index.subscribers_of(42).await.len(), 1);
    }

    #[tokio::test]
    async fn empty_match_entry_is_deleted_not_retained() {
        let index = SubscriptionIndex::new();
        let conn_a = ConnectionId::new();
        let conn_b = ConnectionId::new();

        index.subscribe(42, conn_a).await;
        index.subscribe(42, conn_b).await;
        assert_eq!(index.match_count().await, 1);

        index.unsubscribe(42, &conn_a).await;
        assert_eq!(index.match_count().await, 1);

        index.unsubscribe(42, &conn_b).await;
        assert_eq!(index.match_count().await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_from_never_subscribed_match_is_noop() {
        let index = SubscriptionIndex::new();
        let conn = ConnectionId::new();
        index.subscribe(42, conn).await;

        index.unsubscribe(7, &conn).await;

        assert_eq!(index.subscribers_of(42).await, vec![conn]);
        assert_eq!(index.match_count().await, 1);
    }

    #[tokio::test]
    async fn drop_connection_clears_every_membership() {
        let index = SubscriptionIndex::new();
        let conn = ConnectionId::new();
        let other = ConnectionId::new();

        index.subscribe(1, conn).await;
        index.subscribe(2, conn).await;
        index.subscribe(2, other).await;

        index.drop_connection(&conn).await;

        assert!(index.subscribers_of(1).await.is_empty());
        assert_eq!(index.subscribers_of(2).await, vec![other]);
        assert_eq!(index.match_count().await, 1);
        assert_eq!(index.connection_count().await, 1);
    }

    #[tokio::test]
    async fn drop_unknown_connection_is_noop() {
        let index = SubscriptionIndex::new();
        index.drop_connection(&ConnectionId::new()).await;
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn index_returns_to_baseline_after_churn() {
        let index = SubscriptionIndex::new();
        let conns: Vec<ConnectionId> = (0..8).map(|_| ConnectionId::new()).collect();

        for (i, conn) in conns.iter().enumerate() {
            index.subscribe(i as i64 % 3, *conn).await;
            index.subscribe(100 + i as i64, *conn).await;
        }
        for conn in &conns {
            index.drop_connection(conn).await;
        }

        assert!(index.is_empty().await);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Whatever interleaving of subscribe/unsubscribe a single
            /// connection performs, dropping it leaves the index empty.
            #[test]
            fn drop_always_restores_baseline(ops in prop::collection::vec((0i64..16, prop::bool::ANY), 0..64)) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let index = SubscriptionIndex::new();
                    let conn = ConnectionId::new();

                    for (match_id, sub) in ops {
                        if sub {
                            index.subscribe(match_id, conn).await;
                        } else {
                            index.unsubscribe(match_id, &conn).await;
                        }
                    }

                    index.drop_connection(&conn).await;
                    assert!(index.is_empty().await);
                });
            }
        }
    }
}
