//! End-to-end WebSocket session tests against a live server.

#![allow(clippy::panic)]

mod common;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use note_relay::domain::{InputMode, Octave};
use note_relay::error::RelayError;
use note_relay::midi::{NoteInput, bridge};

use common::{WAIT, start, wait_for};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> Client {
    let Ok((ws, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    ws
}

async fn send(ws: &mut Client, frame: &str) {
    if ws.send(Message::text(frame.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

async fn recv_json(ws: &mut Client) -> Value {
    loop {
        let Ok(next) = tokio::time::timeout(WAIT, ws.next()).await else {
            panic!("timed out waiting for frame");
        };
        match next {
            Some(Ok(Message::Text(text))) => {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("non-json frame: {}", text.as_str());
                };
                return value;
            }
            Some(Ok(_)) => {}
            other => panic!("connection ended: {other:?}"),
        }
    }
}

async fn expect_silence(ws: &mut Client) {
    if let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_millis(200), ws.next()).await
    {
        panic!("unexpected frame: {}", text.as_str());
    }
}

fn scores_dir() -> tempfile::TempDir {
    let Ok(tmp) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    tmp
}

/// Replays raw device messages and then reports the device gone.
#[derive(Debug)]
struct ReplayDevice(VecDeque<Vec<u8>>);

impl NoteInput for ReplayDevice {
    fn port_name(&self) -> &str {
        "replay"
    }

    fn recv(&mut self) -> Result<Vec<u8>, RelayError> {
        self.0
            .pop_front()
            .ok_or_else(|| RelayError::MidiDisconnected("replay".to_string()))
    }
}

#[tokio::test]
async fn default_session_plays_middle_octave() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut ws = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 1).await;

    send(&mut ws, r#"{"type":"key_down","key":"a"}"#).await;
    assert_eq!(
        recv_json(&mut ws).await,
        json!({"type": "note_on", "note": 48, "velocity": 127, "source": "keyboard"})
    );

    send(&mut ws, r#"{"type":"key_up","key":"a"}"#).await;
    assert_eq!(
        recv_json(&mut ws).await,
        json!({"type": "note_on", "note": 48, "velocity": 0, "source": "keyboard"})
    );
}

#[tokio::test]
async fn midi_notes_reach_only_midi_sessions() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut midi_client = connect(addr).await;
    let mut keyboard_client = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 2).await;

    send(&mut midi_client, r#"{"type":"mode_switch","input":"midi"}"#).await;
    wait_for(&state, |sessions| {
        sessions
            .iter()
            .any(|view| view.session.input_mode == InputMode::Midi)
    })
    .await;

    let (device_tx, device_rx) = mpsc::unbounded_channel();
    let pump = state.broadcaster.spawn_device_pump(device_rx);
    let reader = std::thread::spawn(move || {
        let mut device = ReplayDevice(VecDeque::from([vec![0x90, 60, 90]]));
        bridge::run(&mut device, false, |event| device_tx.send(event).is_ok())
    });

    assert_eq!(
        recv_json(&mut midi_client).await,
        json!({"type": "note_on", "note": 60, "velocity": 90, "source": "midi"})
    );
    expect_silence(&mut keyboard_client).await;

    let Ok(result) = reader.join() else {
        panic!("bridge thread panicked");
    };
    assert!(matches!(result, Err(RelayError::MidiDisconnected(_))));
    assert!(pump.await.is_ok());
}

#[tokio::test]
async fn octave_raise_clamps_at_eight() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut ws = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 1).await;

    for _ in 0..5 {
        send(&mut ws, r#"{"type":"key_down","key":"m"}"#).await;
        send(&mut ws, r#"{"type":"key_up","key":"m"}"#).await;
    }
    send(&mut ws, r#"{"type":"key_down","key":"a"}"#).await;
    assert_eq!(
        recv_json(&mut ws).await,
        json!({"type": "note_on", "note": 96, "velocity": 127, "source": "keyboard"})
    );
    wait_for(&state, |sessions| {
        sessions.first().map(|view| view.session.octave) == Some(Octave::MAX)
    })
    .await;
}

#[tokio::test]
async fn malformed_frame_keeps_connection_open() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut ws = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 1).await;

    send(&mut ws, "{this is not json").await;
    send(&mut ws, r#"{"type":"chord","keys":["a","d"]}"#).await;
    send(&mut ws, r#"{"type":"key_down","key":"g"}"#).await;
    assert_eq!(
        recv_json(&mut ws).await,
        json!({"type": "note_on", "note": 55, "velocity": 127, "source": "keyboard"})
    );
}

#[tokio::test]
async fn keyboard_notes_fan_out_to_keyboard_sessions() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut player = connect(addr).await;
    let mut listener = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 2).await;

    send(&mut player, r#"{"type":"key_down","key":"e"}"#).await;
    let expected = json!({"type": "note_on", "note": 51, "velocity": 127, "source": "keyboard"});
    assert_eq!(recv_json(&mut player).await, expected);
    assert_eq!(recv_json(&mut listener).await, expected);
}

#[tokio::test]
async fn fanout_disabled_replies_to_sender_only() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), false).await;
    let mut player = connect(addr).await;
    let mut listener = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 2).await;

    send(&mut player, r#"{"type":"key_down","key":"e"}"#).await;
    assert_eq!(
        recv_json(&mut player).await,
        json!({"type": "note_on", "note": 51, "velocity": 127, "source": "keyboard"})
    );
    expect_silence(&mut listener).await;
}

#[tokio::test]
async fn disconnect_removes_session() {
    let tmp = scores_dir();
    let (addr, state) = start(tmp.path(), true).await;
    let mut leaving = connect(addr).await;
    let _staying = connect(addr).await;
    wait_for(&state, |sessions| sessions.len() == 2).await;

    if leaving.close(None).await.is_err() {
        panic!("close failed");
    }
    wait_for(&state, |sessions| sessions.len() == 1).await;

    let report = state
        .broadcaster
        .broadcast(note_relay::domain::NoteEvent::keyboard(60, true))
        .await;
    assert_eq!(report.delivered, 1);
    assert_eq!(report.dropped, 0);
}
