//! Repository for the `tasks` table.

use inkwell_core::task::{DEFAULT_PRIORITY, DEFAULT_TASK_STATUS};
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, priority, status, deadline, \
                       creator_id, user_email, created_at, updated_at";

/// Live rows, optional title keyword (`$1`), optional creator (`$2`).
const LIST_FILTER: &str = "deleted_at IS NULL \
     AND ($1::TEXT IS NULL OR position(lower($1) in lower(title)) > 0) \
     AND ($2::BIGINT IS NULL OR creator_id = $2)";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task created by `creator_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        user_email: &str,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, priority, status, deadline, creator_id, user_email)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, $4), COALESCE($5, $6), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(DEFAULT_PRIORITY)
            .bind(&input.status)
            .bind(DEFAULT_TASK_STATUS)
            .bind(input.deadline)
            .bind(creator_id)
            .bind(user_email)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Creator of a live task, if the task exists.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT creator_id FROM tasks WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of tasks, newest first.
    ///
    /// `keyword` filters titles case-insensitively; `creator_id` restricts the
    /// list to one user's tasks.
    pub async fn list(
        pool: &PgPool,
        keyword: Option<&str>,
        creator_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE {LIST_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(keyword)
            .bind(creator_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count tasks matching the same filter as [`TaskRepo::list`].
    pub async fn count(
        pool: &PgPool,
        keyword: Option<&str>,
        creator_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM tasks WHERE {LIST_FILTER}");
        sqlx::query_scalar(&query)
            .bind(keyword)
            .bind(creator_id)
            .fetch_one(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                deadline = COALESCE($6, deadline)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(input.deadline)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a task by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tasks SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
