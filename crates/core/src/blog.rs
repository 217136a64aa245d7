//! Blog status constants and field validation.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const BLOG_STATUS_DRAFT: &str = "draft";
pub const BLOG_STATUS_PUBLISHED: &str = "published";

/// All valid blog status values.
pub const VALID_BLOG_STATUSES: &[&str] = &[BLOG_STATUS_DRAFT, BLOG_STATUS_PUBLISHED];

/// Maximum length of a blog title in characters.
pub const MAX_BLOG_TITLE_LENGTH: usize = 100;

/// Maximum length of the free-form category label.
pub const MAX_BLOG_CATEGORY_LENGTH: usize = 50;

/// Maximum length of the comma-separated tag string.
pub const MAX_BLOG_TAGS_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that the status string is one of the accepted values.
pub fn validate_blog_status(status: &str) -> Result<(), String> {
    if VALID_BLOG_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid blog status '{status}'. Must be one of: {}",
            VALID_BLOG_STATUSES.join(", ")
        ))
    }
}

/// Validate a blog title: non-blank and within the length limit.
pub fn validate_blog_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Blog title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_BLOG_TITLE_LENGTH {
        return Err(format!(
            "Blog title exceeds maximum length of {MAX_BLOG_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate blog body content: must not be blank.
pub fn validate_blog_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Blog content cannot be empty".to_string());
    }
    Ok(())
}

/// Validate the optional category and tag labels against their column widths.
pub fn validate_blog_labels(category: Option<&str>, tags: Option<&str>) -> Result<(), String> {
    if category.is_some_and(|c| c.chars().count() > MAX_BLOG_CATEGORY_LENGTH) {
        return Err(format!(
            "Blog category exceeds maximum length of {MAX_BLOG_CATEGORY_LENGTH} characters"
        ));
    }
    if tags.is_some_and(|t| t.chars().count() > MAX_BLOG_TAGS_LENGTH) {
        return Err(format!(
            "Blog tags exceed maximum length of {MAX_BLOG_TAGS_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
