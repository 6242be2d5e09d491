//! Normalized note events relayed to sessions.

use serde::Serialize;

use super::InputMode;

/// Velocity used for every keyboard key press.
pub const MAX_VELOCITY: u8 = 127;

/// Velocity signalling "note released". There is no separate off event.
pub const RELEASE_VELOCITY: u8 = 0;

/// Highest valid MIDI data byte.
const DATA_MASK: u8 = 0x7F;

/// A single note event, never persisted.
///
/// `source` decides which sessions receive it: only those whose
/// [`InputMode`] matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    /// MIDI pitch in `0..=127`.
    pub pitch: u8,
    /// Velocity in `0..=127`; zero releases the note.
    pub velocity: u8,
    /// Origin of the event.
    pub source: InputMode,
}

impl NoteEvent {
    /// Builds a keyboard event: full velocity when `pressed`, release otherwise.
    #[must_use]
    pub fn keyboard(pitch: u8, pressed: bool) -> Self {
        Self {
            pitch: pitch & DATA_MASK,
            velocity: if pressed { MAX_VELOCITY } else { RELEASE_VELOCITY },
            source: InputMode::Keyboard,
        }
    }

    /// Builds a hardware event carrying the device's native pitch and velocity.
    #[must_use]
    pub fn midi(pitch: u8, velocity: u8) -> Self {
        Self {
            pitch: pitch & DATA_MASK,
            velocity: velocity & DATA_MASK,
            source: InputMode::Midi,
        }
    }

    /// Returns `true` if this event releases its note.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        self.velocity == RELEASE_VELOCITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_press_and_release_velocities() {
        let on = NoteEvent::keyboard(48, true);
        let off = NoteEvent::keyboard(48, false);
        assert_eq!(on.velocity, 127);
        assert_eq!(off.velocity, 0);
        assert!(off.is_release());
        assert_eq!(on.source, InputMode::Keyboard);
    }

    #[test]
    fn midi_keeps_native_values() {
        let event = NoteEvent::midi(60, 90);
        assert_eq!(event.pitch, 60);
        assert_eq!(event.velocity, 90);
        assert_eq!(event.source, InputMode::Midi);
    }

    #[test]
    fn midi_masks_status_bit() {
        let event = NoteEvent::midi(0xFF, 0x80);
        assert_eq!(event.pitch, 127);
        assert_eq!(event.velocity, 0);
    }
}
