//! Domain layer: sessions, note events, key mapping, and the registry.
//!
//! Everything here is transport-agnostic; the WebSocket layer and the
//! MIDI bridge both speak in [`NoteEvent`]s and [`Session`]s.

pub mod keymap;
pub mod note_event;
pub mod session;
pub mod session_id;
pub mod session_registry;

pub use keymap::{KeyPhase, OctaveShift};
pub use note_event::NoteEvent;
pub use session::{InputMode, Octave, Session};
pub use session_id::SessionId;
pub use session_registry::{Outbox, SessionRegistry, SessionView};
