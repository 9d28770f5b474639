//! Store error type.

use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// `NotFound` and `Validation` are client-attributable and map to 404/422
/// at the HTTP layer; everything else surfaces as an internal failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed input or an invalid enumerated value.
    #[error("{0}")]
    Validation(String),

    /// SQLite error.
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool checkout failure.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Migration failure.
    #[error("migration failed: {message}")]
    Migration {
        /// What went wrong.
        message: String,
    },
}

impl StoreError {
    /// Not-found error for a task id.
    #[must_use]
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound(format!("task not found: {id}"))
    }

    /// Not-found error for a list id.
    #[must_use]
    pub fn list_not_found(id: &str) -> Self {
        Self::NotFound(format!("list not found: {id}"))
    }

    /// Not-found error for a tag id.
    #[must_use]
    pub fn tag_not_found(id: &str) -> Self {
        Self::NotFound(format!("tag not found: {id}"))
    }

    /// Not-found error for a (task, subtask) pair.
    #[must_use]
    pub fn subtask_not_found(task_id: &str, subtask_id: &str) -> Self {
        Self::NotFound(format!("subtask not found: {subtask_id} on task {task_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_not_found_message() {
        let err = StoreError::task_not_found("task-1");
        assert_eq!(err.to_string(), "task not found: task-1");
    }

    #[test]
    fn subtask_not_found_names_both_ids() {
        let err = StoreError::subtask_not_found("task-1", "sub-2");
        assert!(err.to_string().contains("task-1"));
        assert!(err.to_string().contains("sub-2"));
    }

    #[test]
    fn sqlite_error_converts() {
        let err = StoreError::from(rusqlite::Error::InvalidQuery);
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn validation_displays_message() {
        let err = StoreError::Validation("title is required".into());
        assert_eq!(err.to_string(), "title is required");
    }
}
