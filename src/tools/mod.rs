//! CaloriTrack Tools module
//!
//! Workflows behind the MCP tools: onboarding, goal editing, progress, status.

pub mod goals;
pub mod onboarding;
pub mod progress;
pub mod status;

use thiserror::Error;

use crate::db::DbError;
#[cfg(test)]
use crate::db::Database;

/// Errors raised by the workflows
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("No profile found; complete onboarding first")]
    ProfileNotFound,

    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl WorkflowError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        WorkflowError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// True when the caller sent bad input (as opposed to a server fault)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WorkflowError::InvalidField { .. } | WorkflowError::ProfileNotFound
        )
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Fresh migrated in-memory database
#[cfg(test)]
pub(crate) fn test_db() -> Database {
    let db = Database::open_in_memory().expect("in-memory database");
    db.with_conn(crate::db::migrations::run_migrations)
        .expect("migrations");
    db
}
