//! Per-connection session state: input mode and octave.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which note source a session wants to receive.
///
/// Also tags the origin of every [`super::NoteEvent`]; a session only
/// receives events whose source equals its current mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Computer keyboard emulated over the WebSocket.
    #[default]
    Keyboard,
    /// Hardware MIDI controller attached to the host.
    Midi,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => f.write_str("keyboard"),
            Self::Midi => f.write_str("midi"),
        }
    }
}

/// Octave used to transpose keyboard keys, always within `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Octave(u8);

impl Octave {
    /// Lowest octave.
    pub const MIN: Self = Self(0);
    /// Highest octave.
    pub const MAX: Self = Self(8);
    /// Octave assigned to new sessions.
    pub const DEFAULT: Self = Self(4);

    /// Creates an octave, clamping `value` into `0..=8`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    /// Returns the raw octave number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Moves one octave up. Returns `false` if already at [`Octave::MAX`].
    pub fn raise(&mut self) -> bool {
        if *self >= Self::MAX {
            return false;
        }
        self.0 += 1;
        true
    }

    /// Moves one octave down. Returns `false` if already at [`Octave::MIN`].
    pub fn lower(&mut self) -> bool {
        if *self <= Self::MIN {
            return false;
        }
        self.0 -= 1;
        true
    }
}

impl Default for Octave {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State held for one live connection.
///
/// Mutated only by frames arriving on the owning connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Source of note events this session currently receives.
    pub input_mode: InputMode,
    /// Transposition applied to keyboard keys.
    pub octave: Octave,
}

impl Session {
    /// Creates a session in keyboard mode at octave 4.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
