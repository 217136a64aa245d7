//! CSV rendering of survey answers.
//!
//! One header row (`ID`, `Respondent`, `Created At`, then one column per
//! question) followed by one row per answer. Fields are quoted only when they
//! contain a comma, quote or line break.

use inkwell_db::models::answer::SurveyAnswer;

use super::aligned_values;

/// Render `answers` as CSV with one column per question.
pub fn render_csv(questions: &[String], answers: &[SurveyAnswer]) -> String {
    let mut out = String::new();

    let mut header = vec!["ID".to_string(), "Respondent".to_string(), "Created At".to_string()];
    header.extend(questions.iter().cloned());
    push_row(&mut out, &header);

    for answer in answers {
        let mut row = vec![
            answer.id.to_string(),
            answer.respondent_email.clone(),
            answer.created_at.to_rfc3339(),
        ];
        row.extend(aligned_values(answer, questions.len()));
        push_row(&mut out, &row);
    }

    out
}

fn push_row(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
