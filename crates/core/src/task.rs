//! Task priority/status constants and validation.

pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_LOW: &str = "low";

/// All valid task priorities.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_HIGH, PRIORITY_MEDIUM, PRIORITY_LOW];

/// Priority applied when the client omits one.
pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

pub const TASK_STATUS_PENDING: &str = "pending";
pub const TASK_STATUS_IN_PROGRESS: &str = "in_progress";
pub const TASK_STATUS_COMPLETED: &str = "completed";

/// All valid task statuses.
pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_STATUS_PENDING,
    TASK_STATUS_IN_PROGRESS,
    TASK_STATUS_COMPLETED,
];

/// Status applied when the client omits one.
pub const DEFAULT_TASK_STATUS: &str = TASK_STATUS_PENDING;

/// Maximum length of a task title in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 100;

/// Validate that the priority is one of `high`, `medium`, `low`.
pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

/// Validate that the status is one of `pending`, `in_progress`, `completed`.
pub fn validate_task_status(status: &str) -> Result<(), String> {
    if VALID_TASK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid task status '{status}'. Must be one of: {}",
            VALID_TASK_STATUSES.join(", ")
        ))
    }
}

/// Validate a task title: non-blank and within the length limit.
pub fn validate_task_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Task title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(format!(
            "Task title exceeds maximum length of {MAX_TASK_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}
