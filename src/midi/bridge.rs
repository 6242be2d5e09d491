//! Device bridge: blocking MIDI reads handed off to the async runtime.
//!
//! The bridge owns a dedicated OS thread so that indefinitely blocking
//! device reads never occupy a tokio worker. Its only link to the rest of
//! the server is an unbounded [`mpsc`] sender, whose `send` is thread-safe
//! and never blocks.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;

use super::device::{MidirInput, NoteInput};
use super::message::MidiMessage;
use crate::config::MidiConfig;
use crate::domain::NoteEvent;
use crate::error::RelayError;

/// Reads `device` until it fails or `emit` reports a closed receiver.
///
/// Every note-on becomes a MIDI-sourced [`NoteEvent`]; note-off is
/// forwarded as velocity zero only when `forward_note_off` is set.
///
/// # Errors
///
/// Propagates the first read error from the device.
pub fn run<D: NoteInput>(
    device: &mut D,
    forward_note_off: bool,
    mut emit: impl FnMut(NoteEvent) -> bool,
) -> Result<(), RelayError> {
    loop {
        let bytes = device.recv()?;
        let Some(event) = MidiMessage::parse(&bytes).to_note_event(forward_note_off) else {
            continue;
        };
        tracing::trace!(
            pitch = event.pitch,
            velocity = event.velocity,
            release = event.is_release(),
            "midi note"
        );
        if !emit(event) {
            tracing::debug!(port = device.port_name(), "note receiver closed, stopping bridge");
            return Ok(());
        }
    }
}

/// Starts the bridge thread if MIDI input is enabled.
///
/// The thread opens the first matching device and feeds `events`. Failing
/// to open a device, or a later read error, is logged and ends the thread;
/// it is not restarted and the server keeps running without MIDI input.
pub fn spawn(config: &MidiConfig, events: mpsc::UnboundedSender<NoteEvent>) -> Option<JoinHandle<()>> {
    if !config.enabled {
        tracing::info!("midi input disabled");
        return None;
    }
    let config = config.clone();
    let spawned = thread::Builder::new()
        .name("midi-bridge".to_string())
        .spawn(move || {
            let mut device =
                match MidirInput::open_first(&config.client_name, config.port_filter.as_deref()) {
                    Ok(device) => device,
                    Err(e) => {
                        tracing::warn!(error = %e, "midi input unavailable, continuing without it");
                        return;
                    }
                };
            tracing::info!(port = device.port_name(), "midi input connected");
            let emit = |event: NoteEvent| events.send(event).is_ok();
            match run(&mut device, config.forward_note_off, emit) {
                Ok(()) => tracing::info!(port = device.port_name(), "midi bridge stopped"),
                Err(e) => tracing::error!(port = device.port_name(), error = %e, "midi bridge failed"),
            }
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "failed to spawn midi bridge thread");
            None
        }
    }
}
