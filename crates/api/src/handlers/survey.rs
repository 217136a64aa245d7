//! Handlers for the `/wenjuans` resource: surveys, their category links and answers.
//!
//! Visibility rules:
//! - published surveys are readable by anyone, including anonymous callers;
//! - drafts are visible only to their creator and admins (404 for others);
//! - answers are visible to the survey creator and admins, and each
//!   respondent sees their own.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use inkwell_core::error::CoreError;
use inkwell_core::pagination::Page;
use inkwell_core::survey::{
    check_accepting_answers, check_answer_count, parse_answers, parse_questions, tally_answers,
    validate_deadline, validate_survey_status, validate_survey_title, QuestionTally,
    SURVEY_STATUS_PUBLISHED,
};
use inkwell_core::types::DbId;
use inkwell_db::models::answer::{SubmitAnswer, SurveyAnswer};
use inkwell_db::models::survey::{CreateSurvey, Survey, SurveyDetail, SurveyFilter, UpdateSurvey};
use inkwell_db::repositories::{AnswerRepo, CategoryRepo, SurveyRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::ownership::{RequireOwner, SurveyResource};
use crate::query::SurveyListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Per-question answer statistics for `GET /wenjuans/{id}/stats`.
#[derive(Debug, Serialize)]
pub struct SurveyStats {
    pub survey_id: DbId,
    pub title: String,
    pub status: String,
    pub total_answers: usize,
    pub questions: Vec<QuestionTally>,
}

// ---------------------------------------------------------------------------
// Surveys
// ---------------------------------------------------------------------------

/// GET /wenjuans?page=&page_size=&is_pinned=
///
/// Pinned surveys first, then newest first.
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppQuery(params): AppQuery<SurveyListParams>,
) -> AppResult<Json<DataResponse<Page<Survey>>>> {
    list_page(&state, &viewer, &params).await
}

/// GET /wenjuans/search?title=&page=&page_size=
pub async fn search(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppQuery(params): AppQuery<SurveyListParams>,
) -> AppResult<Json<DataResponse<Page<Survey>>>> {
    if params.title().is_none() {
        return Err(AppError::BadRequest("Query parameter 'title' is required".into()));
    }
    list_page(&state, &viewer, &params).await
}

/// POST /wenjuans
///
/// Creates the survey and links any `category_ids` in one transaction.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(mut input): AppJson<CreateSurvey>,
) -> AppResult<(StatusCode, Json<DataResponse<Survey>>)> {
    validate_survey_title(&input.title).map_err(CoreError::validation)?;
    parse_questions(&input.content).map_err(CoreError::validation)?;
    if let Some(status) = input.status.as_deref() {
        validate_survey_status(status).map_err(CoreError::validation)?;
    }
    validate_deadline(input.deadline, Utc::now()).map_err(CoreError::validation)?;

    input.category_ids = dedupe(&input.category_ids);
    if !input.category_ids.is_empty() {
        let found = CategoryRepo::count_existing(&state.pool, &input.category_ids).await?;
        if found != input.category_ids.len() as i64 {
            return Err(AppError::Core(CoreError::Validation(
                "One or more category ids do not exist".into(),
            )));
        }
    }

    let survey = SurveyRepo::create(&state.pool, auth.user_id, &auth.email, &input).await?;

    tracing::info!(
        survey_id = survey.id,
        categories = input.category_ids.len(),
        user_id = auth.user_id,
        "Survey created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: survey })))
}

/// GET /wenjuans/{id}
///
/// Survey detail with parsed questions, visible answers and categories.
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<SurveyDetail>>> {
    let survey = find_visible(&state, &viewer, id).await?;
    let can_manage = manages(&viewer, &survey);

    let questions = stored_questions(&survey);

    let mut answers = AnswerRepo::list_for_survey(&state.pool, id).await?;
    if !can_manage {
        let email = viewer.0.as_ref().map(|u| u.email.as_str());
        answers.retain(|a| Some(a.respondent_email.as_str()) == email);
    }

    let categories = CategoryRepo::list_for_survey(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: SurveyDetail {
            survey,
            questions,
            answers,
            categories,
        },
    }))
}

/// PUT /wenjuans/{id}
pub async fn update(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
    AppJson(input): AppJson<UpdateSurvey>,
) -> AppResult<Json<DataResponse<Survey>>> {
    if let Some(title) = input.title.as_deref() {
        validate_survey_title(title).map_err(CoreError::validation)?;
    }
    if let Some(content) = input.content.as_deref() {
        parse_questions(content).map_err(CoreError::validation)?;
    }
    if let Some(status) = input.status.as_deref() {
        validate_survey_status(status).map_err(CoreError::validation)?;
    }
    validate_deadline(input.deadline, Utc::now()).map_err(CoreError::validation)?;
    if input.clear_deadline && input.deadline.is_some() {
        return Err(CoreError::validation("Cannot set and clear the deadline together").into());
    }

    let survey = SurveyRepo::update(&state.pool, owner.id, &input)
        .await?
        .ok_or(AppError::not_found("Survey", owner.id))?;

    tracing::info!(survey_id = survey.id, user_id = owner.user.user_id, "Survey updated");

    Ok(Json(DataResponse { data: survey }))
}

/// DELETE /wenjuans/{id}
///
/// Hard delete: removes the survey, its answers and its category links.
pub async fn delete(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<StatusCode> {
    if !SurveyRepo::delete_cascade(&state.pool, owner.id).await? {
        return Err(AppError::not_found("Survey", owner.id));
    }

    tracing::info!(survey_id = owner.id, user_id = owner.user.user_id, "Survey deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /wenjuans/{id}/pin
pub async fn pin(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Json<DataResponse<Survey>>> {
    set_pinned(&state, owner, true).await
}

/// POST /wenjuans/{id}/unpin
pub async fn unpin(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Json<DataResponse<Survey>>> {
    set_pinned(&state, owner, false).await
}

// ---------------------------------------------------------------------------
// Category links
// ---------------------------------------------------------------------------

/// POST /wenjuans/{id}/categories/{category_id}
///
/// Idempotent: linking an already linked category succeeds.
pub async fn add_category(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
    AppPath((_, category_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_survey_exists(&state, owner.id).await?;
    CategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or(AppError::not_found("Category", category_id))?;

    let created = SurveyRepo::add_category(&state.pool, owner.id, category_id).await?;

    tracing::info!(
        survey_id = owner.id,
        category_id,
        created,
        user_id = owner.user.user_id,
        "Survey category linked"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /wenjuans/{id}/categories/{category_id}
pub async fn remove_category(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
    AppPath((_, category_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_survey_exists(&state, owner.id).await?;

    if !SurveyRepo::remove_category(&state.pool, owner.id, category_id).await? {
        return Err(AppError::not_found("Survey category link", category_id));
    }

    tracing::info!(
        survey_id = owner.id,
        category_id,
        user_id = owner.user.user_id,
        "Survey category unlinked"
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// POST /wenjuans/{id}/answers
///
/// The survey must be published and not past its deadline, and the answer
/// array must have one entry per question.
pub async fn submit_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SubmitAnswer>,
) -> AppResult<(StatusCode, Json<DataResponse<SurveyAnswer>>)> {
    let viewer = MaybeAuthUser(Some(auth.clone()));
    let survey = find_visible(&state, &viewer, id).await?;

    check_accepting_answers(&survey.status, survey.deadline, Utc::now())
        .map_err(CoreError::validation)?;
    check_against_questions(&survey, &input.answer)?;

    // The insert re-checks status and deadline in the same statement.
    let answer = AnswerRepo::create(&state.pool, id, &auth.email, &input.answer)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Survey is no longer accepting answers".into(),
            ))
        })?;

    tracing::info!(
        survey_id = id,
        answer_id = answer.id,
        user_id = auth.user_id,
        "Survey answer submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: answer })))
}

/// GET /wenjuans/{id}/answers
pub async fn list_answers(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Json<DataResponse<Vec<SurveyAnswer>>>> {
    ensure_survey_exists(&state, owner.id).await?;
    let answers = AnswerRepo::list_for_survey(&state.pool, owner.id).await?;
    Ok(Json(DataResponse { data: answers }))
}

/// GET /wenjuans/{id}/answers/{answer_id}
pub async fn get_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, answer_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<SurveyAnswer>>> {
    let (_, answer) = find_answer_for(&state, &auth, id, answer_id).await?;
    Ok(Json(DataResponse { data: answer }))
}

/// PUT /wenjuans/{id}/answers/{answer_id}
///
/// Replace an answer set. The new array must match the current question count.
pub async fn update_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, answer_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<SubmitAnswer>,
) -> AppResult<Json<DataResponse<SurveyAnswer>>> {
    let (survey, _) = find_answer_for(&state, &auth, id, answer_id).await?;
    check_against_questions(&survey, &input.answer)?;

    let answer = AnswerRepo::update(&state.pool, id, answer_id, &input.answer)
        .await?
        .ok_or(AppError::not_found("Answer", answer_id))?;

    tracing::info!(
        survey_id = id,
        answer_id,
        user_id = auth.user_id,
        "Survey answer updated"
    );

    Ok(Json(DataResponse { data: answer }))
}

/// DELETE /wenjuans/{id}/answers/{answer_id}
pub async fn delete_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, answer_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_answer_for(&state, &auth, id, answer_id).await?;

    if !AnswerRepo::soft_delete(&state.pool, id, answer_id).await? {
        return Err(AppError::not_found("Answer", answer_id));
    }

    tracing::info!(
        survey_id = id,
        answer_id,
        user_id = auth.user_id,
        "Survey answer deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /wenjuans/{id}/stats
pub async fn stats(
    State(state): State<AppState>,
    owner: RequireOwner<SurveyResource>,
) -> AppResult<Json<DataResponse<SurveyStats>>> {
    let survey = ensure_survey_exists(&state, owner.id).await?;
    let answers = AnswerRepo::list_for_survey(&state.pool, owner.id).await?;

    let questions = stored_questions(&survey);
    let answer_sets: Vec<Vec<String>> = answers
        .iter()
        .filter_map(|a| match parse_answers(&a.answer) {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!(answer_id = a.id, error = %e, "Skipping unparsable answer");
                None
            }
        })
        .collect();

    Ok(Json(DataResponse {
        data: SurveyStats {
            survey_id: survey.id,
            title: survey.title,
            status: survey.status,
            total_answers: answers.len(),
            questions: tally_answers(&questions, &answer_sets),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list_page(
    state: &AppState,
    viewer: &MaybeAuthUser,
    params: &SurveyListParams,
) -> AppResult<Json<DataResponse<Page<Survey>>>> {
    let page = params.page_request();
    let filter = SurveyFilter {
        viewer_id: viewer.user_id(),
        include_all_drafts: viewer.is_admin(),
        is_pinned: params.is_pinned,
        title: params.title().map(str::to_string),
    };

    let total = SurveyRepo::count(&state.pool, &filter).await?;
    let items = SurveyRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;

    Ok(Json(DataResponse {
        data: Page::new(items, total, page),
    }))
}

/// Whether the viewer is the survey's creator or an admin.
fn manages(viewer: &MaybeAuthUser, survey: &Survey) -> bool {
    viewer.is_admin() || viewer.user_id() == Some(survey.creator_id)
}

/// Load a survey the viewer may see. Drafts of other users read as missing.
async fn find_visible(state: &AppState, viewer: &MaybeAuthUser, id: DbId) -> AppResult<Survey> {
    let survey = SurveyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Survey", id))?;

    if survey.status != SURVEY_STATUS_PUBLISHED && !manages(viewer, &survey) {
        return Err(AppError::not_found("Survey", id));
    }
    Ok(survey)
}

/// Re-load a survey after an ownership check. Admins skip the owner lookup,
/// so a missing survey is only detected here.
async fn ensure_survey_exists(state: &AppState, id: DbId) -> AppResult<Survey> {
    SurveyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Survey", id))
}

/// Load an answer the caller may access: its respondent, the survey creator
/// or an admin.
async fn find_answer_for(
    state: &AppState,
    auth: &AuthUser,
    survey_id: DbId,
    answer_id: DbId,
) -> AppResult<(Survey, SurveyAnswer)> {
    let survey = ensure_survey_exists(state, survey_id).await?;
    let answer = AnswerRepo::find_by_id(&state.pool, survey_id, answer_id)
        .await?
        .ok_or(AppError::not_found("Answer", answer_id))?;

    let allowed = auth.is_admin()
        || survey.creator_id == auth.user_id
        || answer.respondent_email == auth.email;
    if !allowed {
        return Err(AppError::forbidden(
            "You do not have permission to access this answer",
        ));
    }
    Ok((survey, answer))
}

/// Validate an answer payload against the survey's current questions.
fn check_against_questions(survey: &Survey, answer: &str) -> AppResult<()> {
    let questions = parse_questions(&survey.content).map_err(|e| {
        AppError::InternalError(format!("Survey {} has invalid content: {e}", survey.id))
    })?;
    let answers = parse_answers(answer).map_err(CoreError::validation)?;
    check_answer_count(&answers, &questions).map_err(CoreError::validation)?;
    Ok(())
}

/// Questions of a stored survey. Content is validated on write, so a parse
/// failure here is logged and treated as an empty list.
fn stored_questions(survey: &Survey) -> Vec<String> {
    parse_questions(&survey.content).unwrap_or_else(|e| {
        tracing::warn!(survey_id = survey.id, error = %e, "Stored survey content is invalid");
        Vec::new()
    })
}

async fn set_pinned(
    state: &AppState,
    owner: RequireOwner<SurveyResource>,
    pinned: bool,
) -> AppResult<Json<DataResponse<Survey>>> {
    let survey = SurveyRepo::set_pinned(&state.pool, owner.id, pinned)
        .await?
        .ok_or(AppError::not_found("Survey", owner.id))?;

    tracing::info!(
        survey_id = survey.id,
        pinned,
        user_id = owner.user.user_id,
        "Survey pin changed"
    );
    Ok(Json(DataResponse { data: survey }))
}

fn dedupe(ids: &[DbId]) -> Vec<DbId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
