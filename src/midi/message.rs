//! Decoding of raw MIDI channel messages.

use crate::domain::NoteEvent;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;

/// Channel message kinds the relay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// `0x9n`. A velocity of zero is kept as-is; it already means release.
    NoteOn {
        /// Channel 0-15.
        channel: u8,
        /// Note number.
        note: u8,
        /// Key velocity.
        velocity: u8,
    },
    /// `0x8n`.
    NoteOff {
        /// Channel 0-15.
        channel: u8,
        /// Note number.
        note: u8,
        /// Release velocity.
        velocity: u8,
    },
    /// Anything else: controllers, clock, sysex, truncated messages.
    Other,
}

impl MidiMessage {
    /// Decodes one native message.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        let &[status, note, velocity, ..] = bytes else {
            return Self::Other;
        };
        let channel = status & 0x0F;
        match status & 0xF0 {
            STATUS_NOTE_ON => Self::NoteOn {
                channel,
                note,
                velocity,
            },
            STATUS_NOTE_OFF => Self::NoteOff {
                channel,
                note,
                velocity,
            },
            _ => Self::Other,
        }
    }

    /// Converts to a MIDI-sourced [`NoteEvent`].
    ///
    /// Note-on always converts. Note-off converts to a velocity-zero event
    /// only when `forward_note_off` is set.
    #[must_use]
    pub fn to_note_event(self, forward_note_off: bool) -> Option<NoteEvent> {
        match self {
            Self::NoteOn { note, velocity, .. } => Some(NoteEvent::midi(note, velocity)),
            Self::NoteOff { note, .. } if forward_note_off => Some(NoteEvent::midi(note, 0)),
            Self::NoteOff { .. } | Self::Other => None,
        }
    }
}
