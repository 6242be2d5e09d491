//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unparseable values fall back to their
//! defaults, except `LISTEN_ADDR`, which must be valid.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Directory holding `*.json` score files.
    pub scores_dir: PathBuf,

    /// When `true`, keyboard notes reach every keyboard-mode session;
    /// otherwise only the sender hears its own keys.
    pub keyboard_fanout: bool,

    /// Timeout applied to REST requests (not to WebSocket sessions).
    pub request_timeout: Duration,

    /// Hardware MIDI input settings.
    pub midi: MidiConfig,
}

/// Settings for the MIDI device bridge.
#[derive(Debug, Clone)]
pub struct MidiConfig {
    /// Start the device bridge at all.
    pub enabled: bool,
    /// Client name announced to the MIDI backend.
    pub client_name: String,
    /// Select the first port whose name contains this substring.
    pub port_filter: Option<String>,
    /// Forward note-off messages as velocity-zero note events.
    pub forward_note_off: bool,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            client_name: "note-relay".to_string(),
            port_filter: None,
            forward_note_off: false,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let raw_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("invalid LISTEN_ADDR {raw_addr:?}"))?;

        let scores_dir = std::env::var("SCORES_DIR")
            .map_or_else(|_| PathBuf::from("scores"), PathBuf::from);

        let defaults = MidiConfig::default();
        let midi = MidiConfig {
            enabled: parse_env_bool("MIDI_ENABLED", defaults.enabled),
            client_name: std::env::var("MIDI_CLIENT_NAME").unwrap_or(defaults.client_name),
            port_filter: std::env::var("MIDI_PORT_FILTER")
                .ok()
                .filter(|filter| !filter.is_empty()),
            forward_note_off: parse_env_bool("MIDI_FORWARD_NOTE_OFF", defaults.forward_note_off),
        };

        Ok(Self {
            listen_addr,
            scores_dir,
            keyboard_fanout: parse_env_bool("KEYBOARD_FANOUT", true),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 10)),
            midi,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
