//! HTTP DTOs for match endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::matches::NewMatch;

/// Request to create a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
}

impl From<CreateMatchRequest> for NewMatch {
    fn from(req: CreateMatchRequest) -> Self {
        NewMatch {
            sport: req.sport,
            home_team: req.home_team,
            away_team: req.away_team,
            start_time: req.start_time,
            end_time: req.end_time,
            home_score: req.home_score.unwrap_or(0),
            away_score: req.away_score.unwrap_or(0),
        }
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_request() {
        let req: CreateMatchRequest = serde_json::from_str(
            r#"{"sport": "football", "homeTeam": "Arsenal", "awayTeam": "Chelsea"}"#,
        )
        .unwrap();
        assert_eq!(req.home_team, "Arsenal");

        let new: NewMatch = req.into();
        assert_eq!(new.home_score, 0);
        assert!(new.start_time.is_none());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let result: Result<CreateMatchRequest, _> =
            serde_json::from_str(r#"{"sport": "football"}"#);
        assert!(result.is_err());
    }
}
