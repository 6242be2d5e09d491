//! Score library handlers: list and fetch.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ScoreListResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RelayError};

/// `GET /scores` — List saved scores.
///
/// # Errors
///
/// Returns [`RelayError::Io`] if the score directory cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/scores",
    tag = "Scores",
    summary = "List scores",
    description = "Returns the id and title of every saved score, sorted by id.",
    responses(
        (status = 200, description = "Score list", body = ScoreListResponse),
        (status = 500, description = "Score directory unreadable", body = ErrorResponse),
    )
)]
pub async fn list_scores(State(state): State<AppState>) -> Result<impl IntoResponse, RelayError> {
    let scores = state.scores.list().await?;
    Ok(Json(ScoreListResponse::from(scores)))
}

/// `GET /scores/:id` — Fetch one score document.
///
/// # Errors
///
/// - [`RelayError::InvalidScoreId`] if the id contains anything but
///   letters, digits, `_` or `-`.
/// - [`RelayError::ScoreNotFound`] if no such score exists.
#[utoipa::path(
    get,
    path = "/api/v1/scores/{id}",
    tag = "Scores",
    summary = "Get score",
    description = "Returns the full JSON document of one saved score.",
    params(
        ("id" = String, Path, description = "Score id (file stem)"),
    ),
    responses(
        (status = 200, description = "Score document", body = serde_json::Value),
        (status = 400, description = "Invalid score id", body = ErrorResponse),
        (status = 404, description = "Score not found", body = ErrorResponse),
    )
)]
pub async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let score = state.scores.load(&id).await?;
    Ok(Json(score))
}

/// Score routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scores", get(list_scores))
        .route("/scores/{id}", get(get_score))
}
