//! Primitive aliases shared by every crate in the workspace.

/// Row ids (users, blogs, tasks, surveys, answers, categories) are `BIGSERIAL`.
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, always handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
