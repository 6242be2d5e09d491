//! Shared helpers: start a server on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use note_relay::app_state::AppState;
use note_relay::server::build_app;
use note_relay::service::ScoreStore;

/// Upper bound for any single wait in the integration tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Serves a fresh app on `127.0.0.1:0` and returns its address and state.
pub async fn start(scores_dir: &Path, keyboard_fanout: bool) -> (SocketAddr, AppState) {
    let state = AppState::new(ScoreStore::new(scores_dir), keyboard_fanout);
    let app = build_app(state.clone(), Duration::from_secs(5));

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, state)
}

/// Polls `check` against the registry until it holds or [`WAIT`] expires.
pub async fn wait_for<F>(state: &AppState, mut check: F)
where
    F: FnMut(&[note_relay::domain::SessionView]) -> bool,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if check(&state.registry.snapshot().await) {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("registry condition not met within {WAIT:?}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
