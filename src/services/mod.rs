pub mod attendance_service;
pub mod clock;
pub mod decision;
pub mod report_service;
pub mod request_service;
pub mod schedule_resolver;

use crate::db::repository::RepoError;
use crate::error::AppError;

/// Conflicts the caller can act on become validation errors; anything else
/// stays a storage failure.
pub(crate) fn rejected(e: RepoError, message: impl Into<String>) -> AppError {
    match e {
        RepoError::Duplicate | RepoError::NotPending | RepoError::Constraint(_) => {
            AppError::Validation(message.into())
        }
        other => AppError::Storage(other),
    }
}
