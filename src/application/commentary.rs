//! Commentary use cases: post with fan-out to subscribers, and list.

use std::sync::Arc;

use crate::adapters::websocket::Broadcaster;
use crate::domain::commentary::{Commentary, NewCommentary};
use crate::domain::foundation::DomainError;
use crate::ports::MatchStore;

use super::clamp_limit;

/// Posts commentary to a match and pushes it to its subscribers.
#[derive(Clone)]
pub struct PostCommentaryHandler {
    store: Arc<dyn MatchStore>,
    broadcaster: Broadcaster,
}

impl PostCommentaryHandler {
    pub fn new(store: Arc<dyn MatchStore>, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Validates, persists, then broadcasts to the match's subscribers.
    ///
    /// A missing match surfaces as `MatchNotFound` from the store and
    /// produces no broadcast.
    pub async fn handle(
        &self,
        match_id: i64,
        new: NewCommentary,
    ) -> Result<Commentary, DomainError> {
        new.validate()?;

        let row = self.store.create_commentary(match_id, new).await?;
        tracing::info!(match_id, commentary_id = row.id, "commentary posted");

        self.broadcaster.broadcast_commentary(match_id, &row).await;
        Ok(row)
    }
}

/// Lists the newest commentary for a match.
#[derive(Clone)]
pub struct ListCommentaryHandler {
    store: Arc<dyn MatchStore>,
}

impl ListCommentaryHandler {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        match_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Commentary>, DomainError> {
        self.store.list_commentary(match_id, clamp_limit(limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::adapters::websocket::{ConnectionId, OutboundFrame};
    use crate::application::matches::tests::{fanout, FakeStore};
    use crate::application::matches::CreateMatchHandler;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::matches::NewMatch;

    fn valid_match() -> NewMatch {
        NewMatch {
            sport: "football".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            start_time: None,
            end_time: None,
            home_score: 0,
            away_score: 0,
        }
    }

    fn goal() -> NewCommentary {
        NewCommentary {
            minute: Some(23),
            event_type: Some("goal".to_string()),
            message: "What a strike!".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn posted_commentary_reaches_subscribers_only() {
        let store = Arc::new(FakeStore::new());
        let (broadcaster, registry, index) = fanout();
        CreateMatchHandler::new(store.clone(), broadcaster.clone())
            .handle(valid_match())
            .await
            .unwrap();
        let handler = PostCommentaryHandler::new(store, broadcaster);

        let (sub_tx, mut sub_rx) = mpsc::unbounded_channel();
        let subscriber = ConnectionId::new();
        registry.register(subscriber, sub_tx).await;
        index.subscribe(1, subscriber).await;

        let (other_tx, mut other_rx) = mpsc::unbounded_channel();
        registry.register(ConnectionId::new(), other_tx).await;

        let row = handler.handle(1, goal()).await.unwrap();
        assert_eq!(row.match_id, 1);

        match sub_rx.try_recv().unwrap() {
            OutboundFrame::Text(text) => {
                assert!(text.contains(r#""type":"commentary""#));
                assert!(text.contains("What a strike!"));
            }
            other => panic!("expected text frame, got {:?}", other),
        }
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_match_surfaces_not_found_without_broadcast() {
        let store = Arc::new(FakeStore::new());
        let (broadcaster, registry, index) = fanout();
        let handler = PostCommentaryHandler::new(store, broadcaster);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = ConnectionId::new();
        registry.register(conn, tx).await;
        index.subscribe(99, conn).await;

        let err = handler.handle(99, goal()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MatchNotFound);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_the_store() {
        let store = Arc::new(FakeStore::new());
        let (broadcaster, _registry, _index) = fanout();
        let handler = PostCommentaryHandler::new(store, broadcaster);

        let mut bad = goal();
        bad.message = "  ".to_string();
        let err = handler.handle(1, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
