//! Fan-out of note events to mode-matching sessions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{NoteEvent, SessionRegistry};

/// Outcome of one [`Broadcaster::broadcast`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sessions the event was queued for.
    pub delivered: usize,
    /// Matching sessions whose connection was gone; these were removed.
    pub dropped: usize,
}

/// Delivers each [`NoteEvent`] to every session whose input mode equals the
/// event source.
///
/// Delivery goes through each connection's outbox, so a slow socket never
/// holds up other recipients and events from one source reach a given
/// session in call order.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<SessionRegistry>,
}

impl Broadcaster {
    /// Creates a broadcaster over `registry`.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Queues `event` for all matching sessions.
    ///
    /// A failed delivery removes that session and does not affect the rest.
    pub async fn broadcast(&self, event: NoteEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for view in self.registry.snapshot().await {
            if view.session.input_mode != event.source {
                continue;
            }
            if view.deliver(event) {
                report.delivered += 1;
            } else {
                report.dropped += 1;
                self.registry.remove(view.id).await;
                tracing::debug!(session_id = %view.id, "dropped stale session during broadcast");
            }
        }
        tracing::trace!(
            pitch = event.pitch,
            velocity = event.velocity,
            source = %event.source,
            delivered = report.delivered,
            dropped = report.dropped,
            "note broadcast"
        );
        report
    }

    /// Spawns the task that drains device events into [`broadcast`](Self::broadcast).
    ///
    /// The sending half is handed to the MIDI bridge thread; the task ends
    /// once every sender is dropped.
    pub fn spawn_device_pump(&self, mut events: mpsc::UnboundedReceiver<NoteEvent>) -> JoinHandle<()> {
        let broadcaster = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                broadcaster.broadcast(event).await;
            }
            tracing::debug!("device event channel closed");
        })
    }
}
