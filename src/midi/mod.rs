//! Hardware MIDI input: device access, message decoding, and the bridge
//! thread that feeds note events into the broadcast path.

pub mod bridge;
pub mod device;
pub mod message;

pub use device::{MidirInput, NoteInput};
pub use message::MidiMessage;
