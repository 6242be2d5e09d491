//! WebSocket layer: upgrade handler, frame types, and the session loop.
//!
//! The endpoint at `/ws` carries JSON text frames: key and mode-switch
//! frames inbound, `note_on` frames outbound.

pub mod connection;
pub mod handler;
pub mod messages;
