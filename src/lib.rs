//! # note-relay
//!
//! Real-time collaborative instrument hub. Participants connect over
//! WebSocket, choose an input mode, and receive normalized `note_on`
//! events from either computer keyboards (their own and other
//! participants') or a hardware MIDI controller attached to the host.
//!
//! ## Architecture
//!
//! ```text
//! Browser clients (WebSocket /ws)        MIDI controller
//!     │                                       │
//!     ├── Session loop (ws/)                  ├── Device bridge thread (midi/)
//!     │     └── keymap (domain/)              │
//!     │                                       └── mpsc ──► device pump task
//!     │                                                       │
//!     └──────────────► Broadcaster (service/) ◄───────────────┘
//!                          │
//!                          └── SessionRegistry (domain/) ──► per-session outbox
//!
//! REST (api/): /health, /api/v1/scores
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod midi;
pub mod server;
pub mod service;
pub mod ws;
