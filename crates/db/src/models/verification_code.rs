//! Pending email verification code.

use inkwell_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `verification_codes` table. One live code per email.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub email: String,
    pub code: String,
    pub expires_at: Timestamp,
    /// Failed login attempts against this code.
    pub attempts: i32,
    pub created_at: Timestamp,
}
