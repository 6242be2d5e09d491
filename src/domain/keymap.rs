//! Computer-keyboard to MIDI pitch translation.
//!
//! Twelve home-row keys cover one chromatic octave, piano style: the
//! bottom row letters are white keys and the row above holds the black
//! keys. `z` and `m` shift the session octave down and up.
//!
//! ```text
//!   w e   t y u
//!  a s d f g h j
//! ```

use super::{InputMode, NoteEvent, Octave, Session};

/// Key symbols and their semitone offset within the octave.
pub const KEY_OFFSETS: [(&str, u8); 12] = [
    ("a", 0),
    ("w", 1),
    ("s", 2),
    ("e", 3),
    ("d", 4),
    ("f", 5),
    ("t", 6),
    ("g", 7),
    ("y", 8),
    ("h", 9),
    ("u", 10),
    ("j", 11),
];

/// Key that lowers the session octave.
pub const OCTAVE_DOWN_KEY: &str = "z";

/// Key that raises the session octave.
pub const OCTAVE_UP_KEY: &str = "m";

/// Phase of a note-producing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
}

/// Direction of an octave-control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctaveShift {
    /// One octave down, floor 0.
    Lower,
    /// One octave up, ceiling 8.
    Raise,
}

impl OctaveShift {
    /// Recognizes the two octave-control keys.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case(OCTAVE_DOWN_KEY) {
            Some(Self::Lower)
        } else if key.eq_ignore_ascii_case(OCTAVE_UP_KEY) {
            Some(Self::Raise)
        } else {
            None
        }
    }

    /// Applies the shift, returning whether the octave changed.
    pub fn apply(self, octave: &mut Octave) -> bool {
        match self {
            Self::Lower => octave.lower(),
            Self::Raise => octave.raise(),
        }
    }
}

/// Returns the semitone offset of a note key.
#[must_use]
pub fn semitone_offset(key: &str) -> Option<u8> {
    KEY_OFFSETS
        .iter()
        .find(|(symbol, _)| key.eq_ignore_ascii_case(symbol))
        .map(|&(_, offset)| offset)
}

/// Maps a key to `octave * 12 + offset`, or `None` for unmapped keys.
#[must_use]
pub fn map_key(key: &str, octave: Octave) -> Option<u8> {
    semitone_offset(key).map(|offset| octave.get() * 12 + offset)
}

/// Handles an octave-control key; any other key is a no-op.
///
/// Returns `true` if the session octave changed.
pub fn adjust_octave(key: &str, session: &mut Session) -> bool {
    OctaveShift::from_key(key).is_some_and(|shift| shift.apply(&mut session.octave))
}

/// Advances a session by one key event and returns the note it produces.
///
/// Sessions outside keyboard mode ignore keys entirely. Octave keys act
/// once on [`KeyPhase::Down`] and never emit a note.
pub fn translate(session: &mut Session, key: &str, phase: KeyPhase) -> Option<NoteEvent> {
    if session.input_mode != InputMode::Keyboard {
        return None;
    }
    if OctaveShift::from_key(key).is_some() {
        if phase == KeyPhase::Down {
            adjust_octave(key, session);
        }
        return None;
    }
    let pitch = map_key(key, session.octave)?;
    Some(NoteEvent::keyboard(pitch, phase == KeyPhase::Down))
}
