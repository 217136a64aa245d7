//! Repository for the `survey_answers` table.

use inkwell_core::survey::SURVEY_STATUS_PUBLISHED;
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::answer::SurveyAnswer;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, survey_id, respondent_email, answer, created_at, updated_at";

/// Provides CRUD operations for survey answers.
///
/// Every lookup is scoped by `survey_id` so an answer id from one survey
/// cannot be used through another survey's route.
pub struct AnswerRepo;

impl AnswerRepo {
    /// Insert an answer set if the survey is still accepting answers.
    ///
    /// The insert is guarded in the same statement: the survey must be live,
    /// published and not past its deadline. Returns `None` when the guard fails.
    pub async fn create(
        pool: &PgPool,
        survey_id: DbId,
        respondent_email: &str,
        answer: &str,
    ) -> Result<Option<SurveyAnswer>, sqlx::Error> {
        let query = format!(
            "INSERT INTO survey_answers (survey_id, respondent_email, answer)
             SELECT s.id, $2, $3 FROM surveys s
             WHERE s.id = $1
               AND s.deleted_at IS NULL
               AND s.status = $4
               AND (s.deadline IS NULL OR s.deadline >= NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyAnswer>(&query)
            .bind(survey_id)
            .bind(respondent_email)
            .bind(answer)
            .bind(SURVEY_STATUS_PUBLISHED)
            .fetch_optional(pool)
            .await
    }

    /// Find a live answer belonging to `survey_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        survey_id: DbId,
        id: DbId,
    ) -> Result<Option<SurveyAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_answers
             WHERE id = $1 AND survey_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, SurveyAnswer>(&query)
            .bind(id)
            .bind(survey_id)
            .fetch_optional(pool)
            .await
    }

    /// List all live answers of a survey in submission order.
    pub async fn list_for_survey(
        pool: &PgPool,
        survey_id: DbId,
    ) -> Result<Vec<SurveyAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_answers
             WHERE survey_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, SurveyAnswer>(&query)
            .bind(survey_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the answer payload. Returns `None` if the answer does not exist.
    pub async fn update(
        pool: &PgPool,
        survey_id: DbId,
        id: DbId,
        answer: &str,
    ) -> Result<Option<SurveyAnswer>, sqlx::Error> {
        let query = format!(
            "UPDATE survey_answers SET answer = $3
             WHERE id = $1 AND survey_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyAnswer>(&query)
            .bind(id)
            .bind(survey_id)
            .bind(answer)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an answer. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        survey_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE survey_answers SET deleted_at = NOW()
             WHERE id = $1 AND survey_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(survey_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
