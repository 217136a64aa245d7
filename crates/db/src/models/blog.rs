//! Blog post model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `blogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Blog {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub status: String,
    pub likes: i64,
    pub user_id: DbId,
    pub user_email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a blog post. The author comes from the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlog {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    /// Defaults to `draft` when omitted.
    pub status: Option<String>,
}

/// DTO for updating a blog post. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
}

/// Current like count after a like or dislike.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogLikes {
    pub id: DbId,
    pub likes: i64,
}
