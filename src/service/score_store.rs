//! Read-only access to saved scores on disk.
//!
//! A score is a `<id>.json` file in the configured directory. The id is the
//! file stem and the optional top-level `"title"` string names it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::RelayError;

const SCORE_EXTENSION: &str = "json";
const MAX_ID_LEN: usize = 128;

/// Identifier and title of one saved score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreSummary {
    /// File stem, used in `GET /api/v1/scores/{id}`.
    pub id: String,
    /// Display title, falling back to the id.
    pub title: String,
}

/// Score library rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    dir: PathBuf,
}

impl ScoreStore {
    /// Creates a store reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory scores are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists every readable score, sorted by id.
    ///
    /// A missing directory yields an empty list. Files that cannot be read
    /// or parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Io`] if the directory exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<ScoreSummary>, RelayError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut scores = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SCORE_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if validate_id(id).is_err() {
                continue;
            }
            let id = id.to_string();
            match read_score(&path, &id).await {
                Ok(doc) => {
                    let title = doc
                        .get("title")
                        .and_then(|v| v.as_str())
                        .map_or_else(|| id.clone(), str::to_string);
                    scores.push(ScoreSummary { id, title });
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping score"),
            }
        }
        scores.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(scores)
    }

    /// Loads the full score document for `id`.
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidScoreId`] if `id` fails sanitization.
    /// - [`RelayError::ScoreNotFound`] if no such file exists.
    /// - [`RelayError::MalformedScore`] if the file is not valid JSON.
    pub async fn load(&self, id: &str) -> Result<serde_json::Value, RelayError> {
        validate_id(id)?;
        let path = self.dir.join(format!("{id}.{SCORE_EXTENSION}"));
        read_score(&path, id).await
    }
}

async fn read_score(path: &Path, id: &str) -> Result<serde_json::Value, RelayError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RelayError::ScoreNotFound(id.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes).map_err(|e| RelayError::MalformedScore {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Accepts only `[A-Za-z0-9_-]{1,128}`, which rules out separators,
/// `..` segments and hidden files.
fn validate_id(id: &str) -> Result<(), RelayError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(RelayError::InvalidScoreId(id.to_string()))
    }
}
