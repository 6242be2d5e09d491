//! Score library DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::ScoreSummary;

/// Response body for `GET /scores`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreListResponse {
    /// Scores sorted by id.
    pub data: Vec<ScoreSummary>,
    /// Number of scores returned.
    pub total: usize,
}

impl From<Vec<ScoreSummary>> for ScoreListResponse {
    fn from(data: Vec<ScoreSummary>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}
