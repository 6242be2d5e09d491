//! note-relay server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, and the
//! MIDI device bridge when enabled.

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use note_relay::app_state::AppState;
use note_relay::config::RelayConfig;
use note_relay::midi::bridge;
use note_relay::server::build_app;
use note_relay::service::ScoreStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting note-relay");

    // Build application state
    let scores = ScoreStore::new(config.scores_dir.clone());
    tracing::info!(dir = %scores.dir().display(), "serving scores");
    let state = AppState::new(scores, config.keyboard_fanout);

    // MIDI bridge thread feeds the device pump on the runtime
    let (device_tx, device_rx) = mpsc::unbounded_channel();
    let _pump = state.broadcaster.spawn_device_pump(device_rx);
    let _bridge = bridge::spawn(&config.midi, device_tx);

    // Build router
    let app = build_app(state, config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
