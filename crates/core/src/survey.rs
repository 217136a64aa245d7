//! Survey ("wenjuan") content rules.
//!
//! Survey questions and answers are persisted as JSON-encoded arrays of
//! strings. Everything here is pure so that handlers, repositories and the
//! export renderers agree on one parsing of that format.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SURVEY_STATUS_DRAFT: &str = "draft";
pub const SURVEY_STATUS_PUBLISHED: &str = "published";

/// All valid survey status values.
pub const VALID_SURVEY_STATUSES: &[&str] = &[SURVEY_STATUS_DRAFT, SURVEY_STATUS_PUBLISHED];

/// Maximum number of questions a single survey may carry.
pub const MAX_QUESTIONS: usize = 200;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that the status string is `draft` or `published`.
pub fn validate_survey_status(status: &str) -> Result<(), String> {
    if VALID_SURVEY_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid survey status '{status}'. Must be one of: {}",
            VALID_SURVEY_STATUSES.join(", ")
        ))
    }
}

/// Validate a survey title: must not be blank.
pub fn validate_survey_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Survey title cannot be empty".to_string());
    }
    Ok(())
}

/// Parse survey content into its question list.
///
/// The content must be a JSON array of strings with at least one entry, and
/// no question may be blank.
pub fn parse_questions(content: &str) -> Result<Vec<String>, String> {
    let questions: Vec<String> = serde_json::from_str(content)
        .map_err(|e| format!("Survey content must be a JSON array of strings: {e}"))?;

    if questions.is_empty() {
        return Err("At least one question is required".to_string());
    }
    if questions.len() > MAX_QUESTIONS {
        return Err(format!("A survey may have at most {MAX_QUESTIONS} questions"));
    }
    if let Some(idx) = questions.iter().position(|q| q.trim().is_empty()) {
        return Err(format!("Question {} cannot be empty", idx + 1));
    }

    Ok(questions)
}

/// Parse an answer payload into its per-question values.
pub fn parse_answers(answer: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(answer).map_err(|e| format!("Answer must be a JSON array of strings: {e}"))
}

/// Ensure an answer set has exactly one entry per question.
pub fn check_answer_count(answers: &[String], questions: &[String]) -> Result<(), String> {
    if answers.len() != questions.len() {
        return Err(format!(
            "Answer count ({}) does not match question count ({})",
            answers.len(),
            questions.len()
        ));
    }
    Ok(())
}

/// Validate that a deadline, when given, lies in the future.
pub fn validate_deadline(deadline: Option<Timestamp>, now: Timestamp) -> Result<(), String> {
    match deadline {
        Some(d) if d <= now => Err("Deadline must be in the future".to_string()),
        _ => Ok(()),
    }
}

/// Check whether a survey can accept new answers at `now`.
///
/// Only published surveys whose deadline (if any) has not passed accept answers.
pub fn check_accepting_answers(
    status: &str,
    deadline: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), String> {
    if status != SURVEY_STATUS_PUBLISHED {
        return Err("Survey is not published and cannot accept answers".to_string());
    }
    if deadline.is_some_and(|d| now > d) {
        return Err("Survey deadline has passed".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregated responses for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionTally {
    /// Zero-based question position.
    pub index: usize,
    pub question: String,
    /// Number of non-blank responses to this question.
    pub responses: usize,
    /// Distinct (trimmed) response values and how often each was given.
    pub counts: BTreeMap<String, usize>,
}

/// Tally answer sets per question.
///
/// Answer sets whose length does not match the question list are ignored so a
/// survey edited after answers were collected still produces coherent stats.
pub fn tally_answers(questions: &[String], answer_sets: &[Vec<String>]) -> Vec<QuestionTally> {
    let mut tallies: Vec<QuestionTally> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionTally {
            index,
            question: question.clone(),
            responses: 0,
            counts: BTreeMap::new(),
        })
        .collect();

    for set in answer_sets.iter().filter(|s| s.len() == questions.len()) {
        for (tally, value) in tallies.iter_mut().zip(set) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            tally.responses += 1;
            *tally.counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    tallies
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
