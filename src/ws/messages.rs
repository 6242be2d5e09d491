//! WebSocket frame types.
//!
//! Both directions are closed, `type`-tagged enums: a frame with an unknown
//! `type`, a missing field, or an unrecognized mode literal fails to parse
//! and is dropped by the session loop.

use serde::{Deserialize, Serialize};

use crate::domain::{InputMode, NoteEvent};

/// Client → server frames.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Select which note source this session receives.
    ModeSwitch {
        /// `"keyboard"` or `"midi"`.
        input: InputMode,
    },
    /// A key was pressed.
    KeyDown {
        /// Key symbol, e.g. `"a"`.
        key: String,
    },
    /// A key was released.
    KeyUp {
        /// Key symbol.
        key: String,
    },
    /// Legacy single-event key: press immediately followed by release.
    KeyPress {
        /// Key symbol.
        key: String,
    },
}

impl InboundFrame {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed or unknown frames.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Server → client frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// A note event; velocity 0 releases the note.
    NoteOn {
        /// MIDI pitch.
        note: u8,
        /// Velocity.
        velocity: u8,
        /// Origin of the note.
        source: InputMode,
    },
}

impl From<NoteEvent> for OutboundFrame {
    fn from(event: NoteEvent) -> Self {
        Self::NoteOn {
            note: event.pitch,
            velocity: event.velocity,
            source: event.source,
        }
    }
}
