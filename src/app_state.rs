//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::SessionRegistry;
use crate::service::{Broadcaster, ScoreStore};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live sessions, one per WebSocket connection.
    pub registry: Arc<SessionRegistry>,
    /// Note fan-out over `registry`.
    pub broadcaster: Broadcaster,
    /// Saved score library.
    pub scores: Arc<ScoreStore>,
    /// Whether keyboard notes reach every keyboard-mode session.
    pub keyboard_fanout: bool,
}

impl AppState {
    /// Builds state around a fresh registry.
    #[must_use]
    pub fn new(scores: ScoreStore, keyboard_fanout: bool) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        Self {
            broadcaster: Broadcaster::new(Arc::clone(&registry)),
            registry,
            scores: Arc::new(scores),
            keyboard_fanout,
        }
    }
}
