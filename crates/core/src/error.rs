use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation error from a `validate_*` message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::blog::validate_blog_status;

    #[test]
    fn validation_messages_convert() {
        let err = validate_blog_status("archived")
            .map_err(CoreError::validation)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("archived"));
    }

    #[test]
    fn not_found_display() {
        let err = CoreError::NotFound {
            entity: "Blog",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: Blog with id 7");
    }
}
