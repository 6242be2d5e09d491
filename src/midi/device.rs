//! Hardware MIDI input devices.
//!
//! [`NoteInput`] is the blocking read seam used by the bridge loop;
//! [`MidirInput`] implements it on top of `midir`, whose callback thread
//! feeds a std channel that [`NoteInput::recv`] blocks on.

use std::fmt;
use std::sync::mpsc::{self, Receiver};

use midir::{Ignore, MidiInput, MidiInputConnection};

use crate::error::RelayError;

/// A source of raw MIDI messages read one at a time.
pub trait NoteInput {
    /// Human-readable name of the opened port.
    fn port_name(&self) -> &str;

    /// Blocks until the next native message arrives.
    ///
    /// # Errors
    ///
    /// Returns an error once the device can no longer deliver messages.
    fn recv(&mut self) -> Result<Vec<u8>, RelayError>;
}

/// An open `midir` input port.
pub struct MidirInput {
    port_name: String,
    messages: Receiver<Vec<u8>>,
    _connection: MidiInputConnection<()>,
}

impl MidirInput {
    /// Opens the first input port, or the first whose name contains
    /// `port_filter` when one is given.
    ///
    /// # Errors
    ///
    /// - [`RelayError::MidiInit`] if the backend cannot be initialized.
    /// - [`RelayError::NoMidiDevice`] if no port matches.
    /// - [`RelayError::MidiConnect`] if the port cannot be opened.
    pub fn open_first(client_name: &str, port_filter: Option<&str>) -> Result<Self, RelayError> {
        let mut midi_in =
            MidiInput::new(client_name).map_err(|e| RelayError::MidiInit(e.to_string()))?;
        midi_in.ignore(Ignore::All);

        let (port, port_name) = midi_in
            .ports()
            .into_iter()
            .filter_map(|port| midi_in.port_name(&port).ok().map(|name| (port, name)))
            .find(|(_, name)| port_filter.is_none_or(|filter| name.contains(filter)))
            .ok_or(RelayError::NoMidiDevice)?;

        let (tx, messages) = mpsc::channel();
        let connection = midi_in
            .connect(
                &port,
                "note-relay-input",
                move |_timestamp, message, _| {
                    // Receiver gone means the bridge has exited.
                    let _ = tx.send(message.to_vec());
                },
                (),
            )
            .map_err(|e| RelayError::MidiConnect(e.to_string()))?;

        Ok(Self {
            port_name,
            messages,
            _connection: connection,
        })
    }
}

impl NoteInput for MidirInput {
    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn recv(&mut self) -> Result<Vec<u8>, RelayError> {
        self.messages
            .recv()
            .map_err(|_| RelayError::MidiDisconnected(self.port_name.clone()))
    }
}

impl fmt::Debug for MidirInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidirInput")
            .field("port_name", &self.port_name)
            .finish_non_exhaustive()
    }
}
