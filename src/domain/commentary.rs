//! Commentary domain types.
//!
//! Commentary rows belong to a match and are pushed to subscribed
//! viewers as `commentary` events once the insert commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::foundation::ValidationError;

/// A persisted commentary row for a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commentary {
    pub id: i64,
    pub match_id: i64,
    pub minute: Option<i32>,
    pub sequence: Option<i32>,
    pub period: Option<String>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for posting commentary to a match.
#[derive(Debug, Clone, Default)]
pub struct NewCommentary {
    pub minute: Option<i32>,
    pub sequence: Option<i32>,
    pub period: Option<String>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
}

impl NewCommentary {
    /// Validates the input fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        if let Some(minute) = self.minute {
            if minute < 0 {
                return Err(ValidationError::out_of_range(
                    "minute",
                    0,
                    i32::MAX as i64,
                    minute as i64,
                ));
            }
        }
        Ok(())
    }
}
