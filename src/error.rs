//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type. Variants that can reach an
//! HTTP client map to a status code and a structured JSON body; the MIDI
//! variants are normally only logged by the device bridge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SessionId;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "score not found: etude-3"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                    |
/// |-----------|-----------------|--------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request                |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict   |
/// | 3000–3099 | Server          | 500 Internal Server Error      |
/// | 3100–3199 | MIDI device     | 503 Service Unavailable        |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Score identifier failed sanitization.
    #[error("invalid score id: {0:?}")]
    InvalidScoreId(String),

    /// No score with the given identifier.
    #[error("score not found: {0}")]
    ScoreNotFound(String),

    /// A session was registered twice under the same handle.
    #[error("session already registered: {0}")]
    DuplicateSession(SessionId),

    /// Score file exists but is not valid JSON.
    #[error("malformed score {id}: {reason}")]
    MalformedScore {
        /// Score identifier.
        id: String,
        /// Parser message.
        reason: String,
    },

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No MIDI input port is available.
    #[error("no midi input device available")]
    NoMidiDevice,

    /// The MIDI backend could not be initialized.
    #[error("midi init failed: {0}")]
    MidiInit(String),

    /// Opening the selected port failed.
    #[error("midi connect failed: {0}")]
    MidiConnect(String),

    /// The device stopped delivering messages.
    #[error("midi device disconnected: {0}")]
    MidiDisconnected(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidScoreId(_) => 1001,
            Self::ScoreNotFound(_) => 2001,
            Self::DuplicateSession(_) => 2002,
            Self::Io(_) => 3001,
            Self::MalformedScore { .. } => 3002,
            Self::NoMidiDevice => 3100,
            Self::MidiInit(_) => 3101,
            Self::MidiConnect(_) => 3102,
            Self::MidiDisconnected(_) => 3103,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidScoreId(_) => StatusCode::BAD_REQUEST,
            Self::ScoreNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateSession(_) => StatusCode::CONFLICT,
            Self::MalformedScore { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoMidiDevice
            | Self::MidiInit(_)
            | Self::MidiConnect(_)
            | Self::MidiDisconnected(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        (status, axum::Json(body)).into_response()
    }
}
