//! Match use cases: create with fan-out, and list.

use std::sync::Arc;

use crate::adapters::websocket::Broadcaster;
use crate::domain::foundation::DomainError;
use crate::domain::matches::{Match, NewMatch};
use crate::ports::MatchStore;

use super::clamp_limit;

/// Creates a match and announces it to every connected viewer.
#[derive(Clone)]
pub struct CreateMatchHandler {
    store: Arc<dyn MatchStore>,
    broadcaster: Broadcaster,
}

impl CreateMatchHandler {
    pub fn new(store: Arc<dyn MatchStore>, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Validates, persists, then broadcasts. The broadcast runs only
    /// after the insert committed, and its outcome is not reported.
    pub async fn handle(&self, new: NewMatch) -> Result<Match, DomainError> {
        new.validate()?;

        let row = self.store.create_match(new).await?;
        tracing::info!(match_id = row.id, sport = %row.sport, "match created");

        self.broadcaster.broadcast_match_created(&row).await;
        Ok(row)
    }
}

/// Lists the newest matches.
#[derive(Clone)]
pub struct ListMatchesHandler {
    store: Arc<dyn MatchStore>,
}

impl ListMatchesHandler {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, limit: Option<u32>) -> Result<Vec<Match>, DomainError> {
        self.store.list_matches(clamp_limit(limit)).await
    }
}
