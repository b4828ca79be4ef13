//! WebSocket endpoint for MCP clients.
//!
//! Flow:
//! 1. Client connects to `/` with an upgrade request
//! 2. Every text (or binary) frame is dispatched on its own task
//! 3. Responses go through an outbound queue drained by one writer task
//! 4. `exit` is handled by the reader itself: it queues the response and a
//!    close frame, then stops reading, so later frames are never dispatched

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use mb_domain::trace::TraceEvent;

use crate::rpc::Dispatcher;
use crate::state::AppState;

/// Outbound queue depth per session.
const OUTBOUND_CAPACITY: usize = 64;

/// How long `exit` waits for the writer to flush the response and close frame.
const EXIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /: upgrade to an MCP session, or answer a plain liveness probe
/// when the request carries no upgrade headers.
pub async fn mcp_ws(ws: Option<WebSocketUpgrade>, State(state): State<AppState>) -> Response {
    match ws {
        Some(ws) => {
            let dispatcher = state.dispatcher.clone();
            ws.on_upgrade(move |socket| run_session(socket, dispatcher))
                .into_response()
        }
        None => liveness_banner().into_response(),
    }
}

pub fn liveness_banner() -> String {
    format!(
        "{} {} is running; connect over WebSocket to use MCP",
        crate::bootstrap::SERVER_NAME,
        env!("CARGO_PKG_VERSION")
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session loop
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    Exit,
    PeerClosed,
    PeerDisconnected,
    TransportError,
}

impl CloseReason {
    fn as_str(self) -> &'static str {
        match self {
            CloseReason::Exit => "exit",
            CloseReason::PeerClosed => "peer_closed",
            CloseReason::PeerDisconnected => "peer_disconnected",
            CloseReason::TransportError => "transport_error",
        }
    }
}

/// Drive one connection until the peer leaves or a client sends `exit`.
pub async fn run_session(socket: WebSocket, dispatcher: Arc<Dispatcher>) {
    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(session_id = %session_id, "session opened");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(OUTBOUND_CAPACITY);

    // Writer task: forwards queued frames to the socket, stops after a close.
    let writer_session = session_id.clone();
    let mut writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if let Err(e) = ws_sink.send(msg).await {
                tracing::debug!(session_id = %writer_session, error = %e, "socket write failed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    // Reader loop: one task per inbound frame, except `exit`.
    let mut frames: u64 = 0;
    let reason = loop {
        let text = match ws_stream.next().await {
            None => break CloseReason::PeerDisconnected,
            Some(Err(e)) => {
                tracing::debug!(session_id = %session_id, error = %e, "socket read failed");
                break CloseReason::TransportError;
            }
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Binary(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
            Some(Ok(Message::Close(_))) => break CloseReason::PeerClosed,
            // axum answers pings itself.
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
        };

        frames += 1;
        if Dispatcher::is_exit(&text) {
            finish_exit(&text, &dispatcher, &outbound_tx).await;
            break CloseReason::Exit;
        }
        spawn_dispatch(
            text,
            dispatcher.clone(),
            outbound_tx.clone(),
            session_id.clone(),
        );
    };

    drop(outbound_tx);
    if reason == CloseReason::Exit {
        if tokio::time::timeout(EXIT_FLUSH_TIMEOUT, &mut writer).await.is_err() {
            tracing::warn!(session_id = %session_id, "writer did not flush before exit timeout");
            writer.abort();
        }
    } else {
        // Handlers still in flight finish on their own; their sends fail.
        writer.abort();
    }

    tracing::info!(
        session_id = %session_id,
        reason = reason.as_str(),
        frames,
        "session closed"
    );
    TraceEvent::SessionClosed {
        session_id,
        reason: reason.as_str().into(),
        frames,
    }
    .emit();
}

fn spawn_dispatch(
    text: String,
    dispatcher: Arc<Dispatcher>,
    outbound: mpsc::Sender<Message>,
    session_id: String,
) {
    tokio::spawn(async move {
        let out = dispatcher.dispatch(&text).await;
        if outbound
            .send(Message::Text(out.response.to_json()))
            .await
            .is_err()
        {
            tracing::debug!(session_id = %session_id, "session gone, response dropped");
        }
    });
}

/// Answer `exit` and queue the close frame. Handlers already in flight may
/// still queue their responses ahead of the close.
async fn finish_exit(text: &str, dispatcher: &Dispatcher, outbound: &mpsc::Sender<Message>) {
    let out = dispatcher.dispatch(text).await;
    // The writer may already be gone if the peer left meanwhile.
    let _ = outbound.send(Message::Text(out.response.to_json())).await;
    if out.close {
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: "exit".into(),
        };
        let _ = outbound.send(Message::Close(Some(frame))).await;
    }
}
