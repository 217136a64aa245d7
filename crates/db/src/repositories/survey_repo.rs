//! Repository for the `surveys` table and its category links.

use inkwell_core::survey::{SURVEY_STATUS_DRAFT, SURVEY_STATUS_PUBLISHED};
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::survey::{CreateSurvey, Survey, SurveyFilter, UpdateSurvey};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, status, deadline, is_pinned, \
                       creator_id, user_email, created_at, updated_at";

/// Shared WHERE clause for list and count.
///
/// `$1` published status, `$2` include all drafts, `$3` viewer id,
/// `$4` pinned filter, `$5` title keyword.
const LIST_FILTER: &str = "deleted_at IS NULL \
     AND (status = $1 OR $2 OR creator_id = $3) \
     AND ($4::BOOLEAN IS NULL OR is_pinned = $4) \
     AND ($5::TEXT IS NULL OR position(lower($5) in lower(title)) > 0)";

/// Provides CRUD operations for surveys.
pub struct SurveyRepo;

impl SurveyRepo {
    /// Insert a new survey, returning the created row.
    ///
    /// If `category_ids` is non-empty, the links are created in the same
    /// transaction. `status` defaults to `draft`.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        user_email: &str,
        input: &CreateSurvey,
    ) -> Result<Survey, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO surveys (title, content, status, deadline, creator_id, user_email)
             VALUES ($1, $2, COALESCE($3, $4), $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let survey = sqlx::query_as::<_, Survey>(&insert_query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.status)
            .bind(SURVEY_STATUS_DRAFT)
            .bind(input.deadline)
            .bind(creator_id)
            .bind(user_email)
            .fetch_one(&mut *tx)
            .await?;

        for &category_id in &input.category_ids {
            sqlx::query(
                "INSERT INTO survey_categories (survey_id, category_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(survey.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(survey)
    }

    /// Find a survey by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM surveys WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Creator of a live survey, if the survey exists.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT creator_id FROM surveys WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of visible surveys, pinned first, then newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &SurveyFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Survey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM surveys
             WHERE {LIST_FILTER}
             ORDER BY is_pinned DESC, created_at DESC, id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(SURVEY_STATUS_PUBLISHED)
            .bind(filter.include_all_drafts)
            .bind(filter.viewer_id)
            .bind(filter.is_pinned)
            .bind(filter.title.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count surveys matching the same filter as [`SurveyRepo::list`].
    pub async fn count(pool: &PgPool, filter: &SurveyFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM surveys WHERE {LIST_FILTER}");
        sqlx::query_scalar(&query)
            .bind(SURVEY_STATUS_PUBLISHED)
            .bind(filter.include_all_drafts)
            .bind(filter.viewer_id)
            .bind(filter.is_pinned)
            .bind(filter.title.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Update a survey. Only non-`None` fields in `input` are applied, and
    /// `clear_deadline` removes the deadline.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!(
            "UPDATE surveys SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                status = COALESCE($4, status),
                deadline = CASE WHEN $6 THEN NULL ELSE COALESCE($5, deadline) END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.status)
            .bind(input.deadline)
            .bind(input.clear_deadline)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the pinned flag. Returns `None` if the survey is gone.
    pub async fn set_pinned(
        pool: &PgPool,
        id: DbId,
        pinned: bool,
    ) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!(
            "UPDATE surveys SET is_pinned = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .bind(pinned)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a survey with its category links and answers.
    ///
    /// All three deletes run in one transaction. Returns `true` if the survey
    /// row was removed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM survey_categories WHERE survey_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM survey_answers WHERE survey_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM surveys WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Category links
    // -----------------------------------------------------------------------

    /// Link a survey to a category. Returns `false` if the link already existed.
    pub async fn add_category(
        pool: &PgPool,
        survey_id: DbId,
        category_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO survey_categories (survey_id, category_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(survey_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a survey-category link. Returns `true` if a link was removed.
    pub async fn remove_category(
        pool: &PgPool,
        survey_id: DbId,
        category_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM survey_categories WHERE survey_id = $1 AND category_id = $2")
                .bind(survey_id)
                .bind(category_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
