//! Survey export renderers.
//!
//! Both formats take the survey row, its parsed question list and its live
//! answers. Answer sets that do not parse or do not match the question count
//! are padded or truncated so every row lines up with the question columns.

pub mod csv;
pub mod pdf;

use inkwell_core::survey::parse_answers;
use inkwell_db::models::answer::SurveyAnswer;

/// Errors that can occur while rendering an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answer values aligned to `question_count` columns.
pub(crate) fn aligned_values(answer: &SurveyAnswer, question_count: usize) -> Vec<String> {
    let mut values = parse_answers(&answer.answer).unwrap_or_else(|e| {
        tracing::warn!(answer_id = answer.id, error = %e, "Exporting unparsable answer as blank");
        Vec::new()
    });
    values.resize(question_count, String::new());
    values
}

/// File name used in the `Content-Disposition` header.
pub fn file_name(survey_id: inkwell_core::types::DbId, extension: &str) -> String {
    format!("survey-{survey_id}.{extension}")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use inkwell_db::models::answer::SurveyAnswer;
    use inkwell_db::models::survey::Survey;

    pub fn survey(content: &str) -> Survey {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        Survey {
            id: 7,
            title: "Team lunch".to_string(),
            content: content.to_string(),
            status: "published".to_string(),
            deadline: None,
            is_pinned: false,
            creator_id: 1,
            user_email: "owner@example.com".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    pub fn answer(id: i64, email: &str, answer: &str) -> SurveyAnswer {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        SurveyAnswer {
            id,
            survey_id: 7,
            respondent_email: email.to_string(),
            answer: answer.to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }
}
