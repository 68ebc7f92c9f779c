//! WebSocket adapters - the real-time fan-out core.
//!
//! Viewers connect once at `/ws` and declare interest in individual
//! matches; committed domain events are pushed to the interested set.
//!
//! # Architecture
//!
//! ```text
//! HTTP write handlers ──▶ Broadcaster ──▶ ConnectionRegistry ──▶ per-connection
//!                             │               ▲    ▲              pump task
//!                             ▼               │    │
//!                       SubscriptionIndex ◀───┘  LivenessSweeper
//! ```
//!
//! The registry owns one unbounded sender per connection, so a
//! broadcast never blocks on a slow peer; the pump task drains the
//! queue onto the socket. The sweeper probes every connection each
//! interval and evicts those that missed the previous probe.
//!
//! # Components
//!
//! - [`messages`] - inbound/outbound wire protocol
//! - [`registry`] - connection registry and liveness state
//! - [`subscriptions`] - match → connections index (both directions)
//! - [`dispatcher`] - best-effort broadcast of committed events
//! - [`liveness`] - periodic sweep task
//! - [`handler`] - axum upgrade handler and per-connection loop

pub mod dispatcher;
pub mod handler;
pub mod liveness;
pub mod messages;
pub mod registry;
pub mod subscriptions;

pub use dispatcher::Broadcaster;
pub use handler::{ws_handler, RealtimeState};
pub use liveness::spawn_sweeper;
pub use messages::{parse_inbound, InboundAction, ServerMessage};
pub use registry::{ConnectionId, ConnectionRegistry, OutboundFrame};
pub use subscriptions::SubscriptionIndex;
