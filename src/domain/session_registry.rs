//! Concurrent session storage with per-session locking.
//!
//! [`SessionRegistry`] keeps one slot per live connection. The outer map is
//! guarded by a [`tokio::sync::RwLock`] taken for writing only on insert and
//! remove; each slot carries its own lock so mutations on different sessions
//! never contend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, mpsc};

use super::{NoteEvent, Session, SessionId};
use crate::error::RelayError;

/// Sending half of a connection's outbound note queue.
pub type Outbox = mpsc::UnboundedSender<NoteEvent>;

#[derive(Debug)]
struct SessionSlot {
    seq: u64,
    session: RwLock<Session>,
    outbox: Outbox,
}

/// Point-in-time copy of one registered session.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Connection handle.
    pub id: SessionId,
    /// Session state at snapshot time.
    pub session: Session,
    outbox: Outbox,
}

impl SessionView {
    /// Queues `event` for the connection.
    ///
    /// Returns `false` if the connection loop has already ended.
    #[must_use]
    pub fn deliver(&self, event: NoteEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

/// Store of all live sessions keyed by [`SessionId`].
///
/// # Concurrency
///
/// - Insert and remove take the map write lock.
/// - [`update`](Self::update) takes the map read lock plus the slot's own
///   write lock, so unrelated sessions update in parallel.
/// - [`snapshot`](Self::snapshot) copies sessions out and holds no lock once
///   it returns.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionSlot>>>,
    next_seq: AtomicU64,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Registers a connection with a default [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DuplicateSession`] if `id` is already present.
    pub async fn register(&self, id: SessionId, outbox: Outbox) -> Result<Session, RelayError> {
        let session = Session::new();
        let mut map = self.sessions.write().await;
        if map.contains_key(&id) {
            return Err(RelayError::DuplicateSession(id));
        }
        let slot = SessionSlot {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            session: RwLock::new(session),
            outbox,
        };
        map.insert(id, Arc::new(slot));
        Ok(session)
    }

    /// Applies `mutator` to the session under `id`.
    ///
    /// Returns `None` when the session is gone, which happens when a
    /// disconnect races with a late frame.
    pub async fn update<R>(&self, id: SessionId, mutator: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let slot = {
            let map = self.sessions.read().await;
            Arc::clone(map.get(&id)?)
        };
        let mut session = slot.session.write().await;
        Some(mutator(&mut session))
    }

    /// Returns a copy of the session under `id`.
    pub async fn get(&self, id: SessionId) -> Option<Session> {
        let slot = {
            let map = self.sessions.read().await;
            Arc::clone(map.get(&id)?)
        };
        let session = *slot.session.read().await;
        Some(session)
    }

    /// Returns every session in registration order.
    pub async fn snapshot(&self) -> Vec<SessionView> {
        let slots: Vec<(SessionId, Arc<SessionSlot>)> = {
            let map = self.sessions.read().await;
            map.iter().map(|(id, slot)| (*id, Arc::clone(slot))).collect()
        };
        let mut views = Vec::with_capacity(slots.len());
        for (id, slot) in slots {
            let session = *slot.session.read().await;
            views.push((
                slot.seq,
                SessionView {
                    id,
                    session,
                    outbox: slot.outbox.clone(),
                },
            ));
        }
        views.sort_by_key(|(seq, _)| *seq);
        views.into_iter().map(|(_, view)| view).collect()
    }

    /// Removes the session under `id`. Removing an absent id is a no-op.
    ///
    /// Returns `true` if a session was removed.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
