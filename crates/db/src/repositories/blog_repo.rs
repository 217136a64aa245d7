//! Repository for the `blogs` table.

use inkwell_core::blog::BLOG_STATUS_DRAFT;
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::blog::{Blog, BlogLikes, CreateBlog, UpdateBlog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, category, tags, status, likes, \
                       user_id, user_email, created_at, updated_at";

/// Shared filter for list and count: live rows, optional title keyword.
/// The keyword is a literal substring, so `%` and `_` match themselves.
const LIST_FILTER: &str = "deleted_at IS NULL \
     AND ($1::TEXT IS NULL OR position(lower($1) in lower(title)) > 0)";

/// Provides CRUD operations for blog posts.
pub struct BlogRepo;

impl BlogRepo {
    /// Insert a new blog post owned by `user_id`, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `draft`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        user_email: &str,
        input: &CreateBlog,
    ) -> Result<Blog, sqlx::Error> {
        let query = format!(
            "INSERT INTO blogs (title, content, category, tags, status, user_id, user_email)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(&input.status)
            .bind(BLOG_STATUS_DRAFT)
            .bind(user_id)
            .bind(user_email)
            .fetch_one(pool)
            .await
    }

    /// Find a blog post by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Owner of a live blog post, if the post exists.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM blogs WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of blog posts, newest first, optionally filtered by a
    /// case-insensitive title keyword.
    pub async fn list(
        pool: &PgPool,
        keyword: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Blog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blogs
             WHERE {LIST_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(keyword)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count blog posts matching the same filter as [`BlogRepo::list`].
    pub async fn count(pool: &PgPool, keyword: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM blogs WHERE {LIST_FILTER}");
        sqlx::query_scalar(&query).bind(keyword).fetch_one(pool).await
    }

    /// Update a blog post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlog,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!(
            "UPDATE blogs SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                status = COALESCE($6, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a blog post by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE blogs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically add one like. Returns the new total, or `None` if the post is gone.
    pub async fn like(pool: &PgPool, id: DbId) -> Result<Option<BlogLikes>, sqlx::Error> {
        sqlx::query_as::<_, BlogLikes>(
            "UPDATE blogs SET likes = likes + 1
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, likes",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Atomically remove one like, never going below zero.
    pub async fn dislike(pool: &PgPool, id: DbId) -> Result<Option<BlogLikes>, sqlx::Error> {
        sqlx::query_as::<_, BlogLikes>(
            "UPDATE blogs SET likes = GREATEST(likes - 1, 0)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, likes",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
