//! Survey answer model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `survey_answers` table.
///
/// `answer` holds the JSON-encoded list of per-question responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyAnswer {
    pub id: DbId,
    pub survey_id: DbId,
    pub respondent_email: String,
    pub answer: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting or replacing an answer set.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswer {
    /// JSON array of answer strings, one per question.
    pub answer: String,
}
