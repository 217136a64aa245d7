//! Survey ("wenjuan") model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::answer::SurveyAnswer;
use super::category::Category;

/// A row from the `surveys` table.
///
/// `content` holds the JSON-encoded question list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Survey {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub status: String,
    pub deadline: Option<Timestamp>,
    pub is_pinned: bool,
    pub creator_id: DbId,
    pub user_email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a survey.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurvey {
    pub title: String,
    /// JSON array of question strings.
    pub content: String,
    /// Defaults to `draft` when omitted.
    pub status: Option<String>,
    pub deadline: Option<Timestamp>,
    /// Categories to link on creation.
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// DTO for updating a survey. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSurvey {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<Timestamp>,
    /// Remove the deadline. Cannot be combined with `deadline`.
    #[serde(default)]
    pub clear_deadline: bool,
}

/// Survey detail response: the row plus parsed questions, answers and categories.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<String>,
    pub answers: Vec<SurveyAnswer>,
    pub categories: Vec<Category>,
}

/// Visibility and search filter for survey listings.
///
/// Published surveys are visible to everyone; drafts only to their creator
/// (`viewer_id`) or when `include_all_drafts` is set for admins.
#[derive(Debug, Clone, Default)]
pub struct SurveyFilter {
    pub viewer_id: Option<DbId>,
    pub include_all_drafts: bool,
    pub is_pinned: Option<bool>,
    pub title: Option<String>,
}
