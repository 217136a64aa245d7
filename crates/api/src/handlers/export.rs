//! Survey export downloads (`/wenjuans/{id}/export/*`). Owner or admin only.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;
use inkwell_core::survey::parse_questions;
use inkwell_core::types::DbId;
use inkwell_db::models::answer::SurveyAnswer;
use inkwell_db::models::survey::Survey;
use inkwell_db::repositories::{AnswerRepo, SurveyRepo};

use crate::error::{AppError, AppResult};
use crate::export::{self, csv::render_csv, pdf::render_pdf};
use crate::middleware::ownership::{RequireOwner, SurveyResource};
use crate::state::AppState;

/// GET /wenjuans/{id}/export/pdf
pub async fn pdf(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Response> {
    let (survey, questions, answers) = load(&state, owner.id).await?;

    let bytes = render_pdf(&survey, &questions, &answers)
        .map_err(|e| AppError::InternalError(format!("Failed to render PDF: {e}")))?;

    tracing::info!(
        survey_id = survey.id,
        answers = answers.len(),
        user_id = owner.user.user_id,
        "Survey exported as PDF"
    );

    attachment("application/pdf", &export::file_name(survey.id, "pdf"), bytes)
}

/// GET /wenjuans/{id}/export/csv
pub async fn csv(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Response> {
    let (survey, questions, answers) = load(&state, owner.id).await?;
    let body = render_csv(&questions, &answers);

    tracing::info!(
        survey_id = survey.id,
        answers = answers.len(),
        user_id = owner.user.user_id,
        "Survey exported as CSV"
    );

    attachment(
        "text/csv; charset=utf-8",
        &export::file_name(survey.id, "csv"),
        body.into_bytes(),
    )
}

async fn load(state: &AppState, id: DbId) -> AppResult<(Survey, Vec<String>, Vec<SurveyAnswer>)> {
    let survey = SurveyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Survey", id))?;
    let questions = parse_questions(&survey.content).map_err(|e| {
        AppError::InternalError(format!("Survey {id} has invalid content: {e}"))
    })?;
    let answers = AnswerRepo::list_for_survey(&state.pool, id).await?;
    Ok((survey, questions, answers))
}

fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}
