//! Match domain types.
//!
//! A match row is created over HTTP, persisted, and then announced to
//! every connected viewer as a `match.created` event. The status field
//! is derived from the scheduled window at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::foundation::ValidationError;

/// Lifecycle status of a match, derived from its scheduled window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl MatchStatus {
    /// Returns the database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }

    /// Parses the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(MatchStatus::Scheduled),
            "live" => Some(MatchStatus::Live),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

/// Derive a match status from its scheduled window.
///
/// A match with no start time is scheduled; one whose window contains
/// `now` is live; one whose end has passed is finished.
pub fn derive_status(
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> MatchStatus {
    match (start_time, end_time) {
        (Some(start), _) if now < start => MatchStatus::Scheduled,
        (Some(_), Some(end)) if now > end => MatchStatus::Finished,
        (Some(_), _) => MatchStatus::Live,
        (None, _) => MatchStatus::Scheduled,
    }
}

/// A persisted match row.
///
/// Serializes with camelCase field names; this is the exact payload
/// carried by the `match.created` broadcast and the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub status: MatchStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub home_score: i32,
    pub away_score: i32,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a match.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub home_score: i32,
    pub away_score: i32,
}

impl NewMatch {
    /// Validates the input fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sport.trim().is_empty() {
            return Err(ValidationError::empty_field("sport"));
        }
        if self.home_team.trim().is_empty() {
            return Err(ValidationError::empty_field("homeTeam"));
        }
        if self.away_team.trim().is_empty() {
            return Err(ValidationError::empty_field("awayTeam"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(ValidationError::invalid_format(
                    "endTime",
                    "end time is before start time",
                ));
            }
        }
        if self.home_score < 0 || self.away_score < 0 {
            return Err(ValidationError::invalid_format(
                "score",
                "scores cannot be negative",
            ));
        }
        Ok(())
    }

    /// Derives the status this match should be created with.
    pub fn initial_status(&self, now: DateTime<Utc>) -> MatchStatus {
        derive_status(self.start_time, self.end_time, now)
    }
}
