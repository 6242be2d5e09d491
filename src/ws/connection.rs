//! WebSocket session loop.
//!
//! Each connection registers a session, then multiplexes inbound frames
//! with its outbox of note events until the peer goes away. The session is
//! removed from the registry on every exit path.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{InboundFrame, OutboundFrame};
use crate::app_state::AppState;
use crate::domain::{KeyPhase, NoteEvent, Outbox, SessionId, keymap};
use crate::service::Broadcaster;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads frames from the client and applies them to its session.
/// - Writes every note event queued in the session's outbox.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let id = SessionId::new();
    let (outbox, mut notes) = mpsc::unbounded_channel();
    if let Err(e) = state.registry.register(id, outbox.clone()).await {
        tracing::error!(session_id = %id, error = %e, "session registration failed");
        return;
    }
    tracing::info!(session_id = %id, "session opened");

    let ctx = SessionContext::new(id, outbox, &state);
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => ctx.handle_text(text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(session_id = %id, error = %e, "ws receive failed");
                        break;
                    }
                }
            }
            // Note queued for this session
            event = notes.recv() => {
                let Some(event) = event else { break };
                let Ok(json) = serde_json::to_string(&OutboundFrame::from(event)) else {
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    tracing::debug!(session_id = %id, "ws send failed");
                    break;
                }
            }
        }
    }

    state.registry.remove(id).await;
    tracing::info!(session_id = %id, "session closed");
}

/// Per-connection handles used while processing inbound frames.
#[derive(Debug, Clone)]
struct SessionContext {
    id: SessionId,
    outbox: Outbox,
    broadcaster: Broadcaster,
    keyboard_fanout: bool,
}

impl SessionContext {
    fn new(id: SessionId, outbox: Outbox, state: &AppState) -> Self {
        Self {
            id,
            outbox,
            broadcaster: state.broadcaster.clone(),
            keyboard_fanout: state.keyboard_fanout,
        }
    }

    /// Applies one text frame. Malformed or unknown frames are dropped.
    async fn handle_text(&self, text: &str) {
        let frame = match InboundFrame::parse(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(session_id = %self.id, error = %e, "dropping unparseable frame");
                return;
            }
        };

        match frame {
            InboundFrame::ModeSwitch { input } => {
                let registry = self.broadcaster.registry();
                if registry.update(self.id, |s| s.input_mode = input).await.is_some() {
                    tracing::debug!(session_id = %self.id, mode = %input, "input mode switched");
                }
            }
            InboundFrame::KeyDown { key } => self.handle_key(&key, &[KeyPhase::Down]).await,
            InboundFrame::KeyUp { key } => self.handle_key(&key, &[KeyPhase::Up]).await,
            InboundFrame::KeyPress { key } => {
                self.handle_key(&key, &[KeyPhase::Down, KeyPhase::Up]).await;
            }
        }
    }

    async fn handle_key(&self, key: &str, phases: &[KeyPhase]) {
        let events: Vec<NoteEvent> = self
            .broadcaster
            .registry()
            .update(self.id, |session| {
                phases
                    .iter()
                    .filter_map(|&phase| keymap::translate(session, key, phase))
                    .collect()
            })
            .await
            .unwrap_or_default();

        for event in events {
            self.emit(event).await;
        }
    }

    async fn emit(&self, event: NoteEvent) {
        if self.keyboard_fanout {
            self.broadcaster.broadcast(event).await;
        } else if self.outbox.send(event).is_err() {
            tracing::debug!(session_id = %self.id, "outbox closed");
        }
    }
}
