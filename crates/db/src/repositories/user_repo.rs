//! Repository for the `users` table.

use inkwell_core::roles::ROLE_USER;
use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, role, created_at, updated_at, deleted_at";

/// Result of a successful code login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// `true` when this login registered a new account.
    pub created: bool,
}

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with the given role, returning the created row.
    pub async fn create(pool: &PgPool, email: &str, role: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, role)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, including soft-deleted rows.
    pub async fn find_by_email_include_deleted(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all live users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                role = COALESCE($3, role)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Consume a verification code and find or register the user for `email`.
    ///
    /// Runs in one transaction: the code row is deleted only if it matches and
    /// has not expired, and the user is created with the `user` role when no
    /// row exists yet. Returns `None` when no matching live code was found, in
    /// which case nothing is changed.
    ///
    /// Soft-deleted users are returned as-is so the caller can refuse them.
    pub async fn login_with_code(
        pool: &PgPool,
        email: &str,
        code: &str,
    ) -> Result<Option<LoginOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let consumed = sqlx::query(
            "DELETE FROM verification_codes
             WHERE email = $1 AND code = $2 AND expires_at > NOW()",
        )
        .bind(email)
        .bind(code)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let insert_query = format!(
            "INSERT INTO users (email, role)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_users_email DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, User>(&insert_query)
            .bind(email)
            .bind(ROLE_USER)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match inserted {
            Some(user) => LoginOutcome {
                user,
                created: true,
            },
            None => {
                let select_query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
                let user = sqlx::query_as::<_, User>(&select_query)
                    .bind(email)
                    .fetch_one(&mut *tx)
                    .await?;
                LoginOutcome {
                    user,
                    created: false,
                }
            }
        };

        tx.commit().await?;
        Ok(Some(outcome))
    }
}
