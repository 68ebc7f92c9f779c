//! WebSocket message types for the viewer protocol.
//!
//! Defines the protocol between server and connected viewers:
//! - Server → Client: welcome, subscribe acks, errors, domain events
//! - Client → Server: subscribe/unsubscribe requests
//!
//! Inbound parsing is deliberately permissive: only unparseable text is
//! answered with an error frame; recognized types with a missing or
//! non-integer `matchId`, and unknown types, are ignored without reply
//! so newer clients never break older servers.

use serde::Serialize;

use crate::domain::commentary::Commentary;
use crate::domain::matches::Match;

// ════════════════════════════════════════════════════════════════════════════
// Server → Client Messages
// ════════════════════════════════════════════════════════════════════════════

/// All message types that can be sent from server to viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent immediately on connect, before any inbound processing.
    Welcome { payload: TextPayload },

    /// Acknowledges a subscribe request.
    Subscribed {
        #[serde(rename = "matchId")]
        match_id: i64,
    },

    /// Acknowledges an unsubscribe request.
    Unsubscribed {
        #[serde(rename = "matchId")]
        match_id: i64,
    },

    /// Reply to unparseable inbound text. The connection stays open.
    Error { payload: TextPayload },

    /// A match was created; announced to every connection.
    #[serde(rename = "match.created")]
    MatchCreated { data: Match },

    /// Commentary was posted; announced to subscribers of the match.
    Commentary { data: Commentary },
}

/// Human-readable payload for welcome and error frames.
#[derive(Debug, Clone, Serialize)]
pub struct TextPayload {
    pub message: String,
}

impl ServerMessage {
    /// Builds the welcome frame sent on connect.
    pub fn welcome() -> Self {
        ServerMessage::Welcome {
            payload: TextPayload {
                message: "Welcome to the WebSocket Server".to_string(),
            },
        }
    }

    /// Builds an error frame with a human-readable reason.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            payload: TextPayload {
                message: message.into(),
            },
        }
    }

    /// Serializes the message to its wire representation.
    ///
    /// ServerMessage contains no map keys or non-string values that can
    /// fail to serialize, so this is infallible in practice; a failure
    /// degrades to an empty frame rather than panicking mid-broadcast.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Client → Server Messages
// ════════════════════════════════════════════════════════════════════════════

/// Outcome of parsing one inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundAction {
    /// `{"type": "subscribe", "matchId": n}`
    Subscribe(i64),
    /// `{"type": "unsubscribe", "matchId": n}`
    Unsubscribe(i64),
    /// Parsed fine but not a recognized shape; no reply, no mutation.
    Ignore,
    /// Unparseable text; answered with one error frame.
    Malformed(String),
}

/// Parses one inbound text frame under the permissive protocol rules.
///
/// `matchId` must be a JSON integer; floats, strings, and missing
/// fields make an otherwise recognized type unrecognized.
pub fn parse_inbound(text: &str) -> InboundAction {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return InboundAction::Malformed(format!("invalid JSON: {}", e)),
    };

    let Some(kind) = value.get("type").and_then(|t| t.as_str()) else {
        return InboundAction::Ignore;
    };

    let match_id = value.get("matchId").and_then(|m| m.as_i64());

    match (kind, match_id) {
        ("subscribe", Some(id)) => InboundAction::Subscribe(id),
        ("unsubscribe", Some(id)) => InboundAction::Unsubscribe(id),
        _ => InboundAction::Ignore,
    }
}
