//! WebSocket upgrade handler and per-connection event loop.
//!
//! Connection lifecycle:
//! 1. Consult the admission policy; a denied attempt is closed with the
//!    mapped code before it ever enters the registry
//! 2. Upgrade to WebSocket, capped at the configured frame size
//! 3. Queue the welcome frame, then register the connection
//! 4. Pump queued frames out / parse inbound frames until disconnect
//! 5. Unregister and drop all subscriptions

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::middleware::client_ip_from_parts;
use crate::ports::{AdmissionDecision, AdmissionPolicy, AdmissionRequest};

use super::{
    messages::{parse_inbound, InboundAction, ServerMessage},
    registry::{ConnectionId, ConnectionRegistry, OutboundFrame},
    subscriptions::SubscriptionIndex,
};

/// Shared state for the real-time endpoint.
#[derive(Clone)]
pub struct RealtimeState {
    /// Registry of live connections and their liveness flags.
    pub registry: Arc<ConnectionRegistry>,
    /// Match subscription index.
    pub index: Arc<SubscriptionIndex>,
    /// Admission policy consulted once per connection attempt.
    pub admission: Arc<dyn AdmissionPolicy>,
    /// Maximum inbound frame size in bytes.
    pub max_message_bytes: usize,
}

impl RealtimeState {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        index: Arc<SubscriptionIndex>,
        admission: Arc<dyn AdmissionPolicy>,
        max_message_bytes: usize,
    ) -> Self {
        Self {
            registry,
            index,
            admission,
            max_message_bytes,
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    State(state): State<RealtimeState>,
) -> Response {
    let ip = client_ip_from_parts(&headers, connect_info.as_ref());
    let decision = state.admission.decide(&AdmissionRequest::ws(ip)).await;

    let ws = ws.max_message_size(state.max_message_bytes);

    match decision {
        AdmissionDecision::Allow => {
            ws.on_upgrade(move |socket| handle_socket(socket, state))
        }
        AdmissionDecision::Deny { rate_limited } => {
            // The denial is delivered as a close frame so the client
            // sees a documented code rather than a failed handshake.
            let (code, reason) = if rate_limited {
                (close_code::AGAIN, "rate limit exceeded")
            } else {
                (close_code::POLICY, "forbidden")
            };
            ws.on_upgrade(move |socket| close_denied(socket, code, reason))
        }
    }
}

/// Closes a denied connection without registering it.
async fn close_denied(mut socket: WebSocket, code: u16, reason: &'static str) {
    tracing::info!(code, reason, "connection denied by admission policy");
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}

/// Runs an admitted connection until it disconnects or is evicted.
async fn handle_socket(socket: WebSocket, state: RealtimeState) {
    let conn_id = ConnectionId::new();
    let (tx, rx) = mpsc::unbounded_channel();

    // Welcome goes onto the queue before registration so it precedes
    // any broadcast that lands between here and the first pump cycle.
    let _ = tx.send(OutboundFrame::Text(ServerMessage::welcome().to_json()));
    state.registry.register(conn_id, tx).await;
    tracing::info!(conn_id = %conn_id, "viewer connected");

    let (sink, stream) = socket.split();

    let mut send_task = tokio::spawn(pump_outbound(sink, rx, conn_id));
    let mut recv_task = tokio::spawn(pump_inbound(
        stream,
        conn_id,
        state.registry.clone(),
        state.index.clone(),
    ));

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Idempotent against the sweeper's eviction path.
    state.registry.unregister(&conn_id).await;
    state.index.drop_connection(&conn_id).await;
    tracing::info!(conn_id = %conn_id, "viewer disconnected");
}

/// Drains the connection's frame queue onto the socket.
///
/// A closed queue means eviction or shutdown; the peer gets a normal
/// close frame. A failed send means the peer is gone.
async fn pump_outbound(
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    conn_id: ConnectionId,
) {
    while let Some(frame) = rx.recv().await {
        let message = match frame {
            OutboundFrame::Text(text) => Message::Text(text),
            OutboundFrame::Ping => Message::Ping(Vec::new()),
        };
        if let Err(e) = sink.send(message).await {
            tracing::debug!(conn_id = %conn_id, "send failed, closing connection: {}", e);
            return;
        }
    }

    let _ = sink
        .send(Message::Close(Some(CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        })))
        .await;
}

/// Processes inbound frames in receipt order.
async fn pump_inbound(
    mut stream: futures::stream::SplitStream<WebSocket>,
    conn_id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
    index: Arc<SubscriptionIndex>,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text(&text, conn_id, &registry, &index).await;
            }
            Ok(Message::Pong(_)) => {
                registry.mark_alive(&conn_id).await;
            }
            Ok(Message::Ping(_)) => {
                // Answered with a pong by the transport layer.
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(conn_id = %conn_id, "ignoring binary frame");
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                // Includes frames over the configured size cap.
                tracing::debug!(conn_id = %conn_id, "receive error: {}", e);
                break;
            }
        }
    }
}

/// Applies one inbound text frame to the subscription index.
///
/// Malformed text gets exactly one error frame and no state change;
/// unrecognized shapes get neither.
async fn handle_text(
    text: &str,
    conn_id: ConnectionId,
    registry: &ConnectionRegistry,
    index: &SubscriptionIndex,
) {
    match parse_inbound(text) {
        InboundAction::Subscribe(match_id) => {
            index.subscribe(match_id, conn_id).await;
            let ack = ServerMessage::Subscribed { match_id }.to_json();
            registry.send_to(&conn_id, OutboundFrame::Text(ack)).await;
            tracing::debug!(conn_id = %conn_id, match_id, "subscribed");
        }
        InboundAction::Unsubscribe(match_id) => {
            index.unsubscribe(match_id, &conn_id).await;
            let ack = ServerMessage::Unsubscribed { match_id }.to_json();
            registry.send_to(&conn_id, OutboundFrame::Text(ack)).await;
            tracing::debug!(conn_id = %conn_id, match_id, "unsubscribed");
        }
        InboundAction::Malformed(reason) => {
            tracing::debug!(conn_id = %conn_id, %reason, "malformed frame");
            let error = ServerMessage::error(reason).to_json();
            registry.send_to(&conn_id, OutboundFrame::Text(error)).await;
        }
        InboundAction::Ignore => {}
    }
}
