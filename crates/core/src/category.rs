//! Survey category naming rules.

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// Validate a category name: non-blank and at most [`MAX_CATEGORY_NAME_LENGTH`] characters.
pub fn validate_category_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Category name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(format!(
            "Category name must be at most {MAX_CATEGORY_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_category_name("Feedback").is_ok());
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name(&"x".repeat(51)).is_err());
        assert!(validate_category_name(&"问".repeat(50)).is_ok());
    }
}
