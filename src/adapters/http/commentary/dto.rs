//! HTTP DTOs for commentary endpoints.

use serde::Deserialize;

use crate::domain::commentary::NewCommentary;

/// Request to post commentary to a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentaryRequest {
    #[serde(default)]
    pub minute: Option<i32>,
    #[serde(default)]
    pub sequence: Option<i32>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    pub message: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<PostCommentaryRequest> for NewCommentary {
    fn from(req: PostCommentaryRequest) -> Self {
        NewCommentary {
            minute: req.minute,
            sequence: req.sequence,
            period: req.period,
            event_type: req.event_type,
            actor: req.actor,
            team: req.team,
            message: req.message,
            metadata: req.metadata,
            tags: req.tags,
        }
    }
}
