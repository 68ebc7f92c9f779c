//! MatchStore port - persistence boundary for matches and commentary.

use async_trait::async_trait;

use crate::domain::commentary::{Commentary, NewCommentary};
use crate::domain::foundation::DomainError;
use crate::domain::matches::{Match, NewMatch};

/// Port for persisting and listing matches and commentary.
///
/// The broadcast dispatcher is only invoked after one of the create
/// operations returns `Ok` — a failed write never produces a broadcast.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Inserts a new match and returns the persisted row.
    async fn create_match(&self, new: NewMatch) -> Result<Match, DomainError>;

    /// Lists the newest matches, up to `limit`.
    async fn list_matches(&self, limit: u32) -> Result<Vec<Match>, DomainError>;

    /// Inserts commentary for a match and returns the persisted row.
    ///
    /// Fails with `MatchNotFound` if the match does not exist.
    async fn create_commentary(
        &self,
        match_id: i64,
        new: NewCommentary,
    ) -> Result<Commentary, DomainError>;

    /// Lists the newest commentary for a match, up to `limit`.
    async fn list_commentary(
        &self,
        match_id: i64,
        limit: u32,
    ) -> Result<Vec<Commentary>, DomainError>;
}
