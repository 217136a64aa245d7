//! Repository for the `verification_codes` table.

use inkwell_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::verification_code::VerificationCode;

const COLUMNS: &str = "email, code, expires_at, attempts, created_at";

/// Stores at most one pending login code per email.
pub struct VerificationCodeRepo;

impl VerificationCodeRepo {
    /// Store a code for `email`, replacing any earlier one.
    pub async fn upsert(
        pool: &PgPool,
        email: &str,
        code: &str,
        expires_at: Timestamp,
    ) -> Result<VerificationCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO verification_codes (email, code, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at,
                attempts = 0,
                created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(email)
            .bind(code)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find the pending code for `email`, expired or not.
    pub async fn find(pool: &PgPool, email: &str) -> Result<Option<VerificationCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM verification_codes WHERE email = $1");
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Count a wrong guess against the code for `email`.
    ///
    /// Once `max_attempts` misses have been recorded the code is deleted.
    /// Returns the number of guesses left, `0` when the code is gone.
    pub async fn record_failed_attempt(
        pool: &PgPool,
        email: &str,
        max_attempts: i32,
    ) -> Result<i32, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let attempts: Option<i32> = sqlx::query_scalar(
            "UPDATE verification_codes SET attempts = attempts + 1
             WHERE email = $1
             RETURNING attempts",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(attempts) = attempts else {
            tx.rollback().await?;
            return Ok(0);
        };

        if attempts >= max_attempts {
            sqlx::query("DELETE FROM verification_codes WHERE email = $1")
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok((max_attempts - attempts).max(0))
    }

    /// Remove every expired code. Returns the number of rows removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
