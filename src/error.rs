//! Error types for Home Library

use sqlx::error::ErrorKind;
use thiserror::Error;

/// How a failure is presented to the person at the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing was written; the request just could not be honoured.
    Warning,
    /// The store failed or rejected a write; pending writes were rolled back.
    Error,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No fields supplied to update")]
    NoFieldsSupplied,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => AppError::Conflict(db.message().to_string()),
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => AppError::Constraint(db.message().to_string()),
                _ => AppError::Database(err),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::Unavailable(err),
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl AppError {
    pub fn severity(&self) -> Severity {
        match self {
            AppError::NotFound(_)
            | AppError::InvalidState(_)
            | AppError::NoFieldsSupplied
            | AppError::Validation(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Log the failure of `action` at the level matching its severity.
    pub fn report(&self, action: &str) {
        match self.severity() {
            Severity::Warning => tracing::warn!("{}: {}", action, self),
            Severity::Error => {
                if let AppError::Database(e) | AppError::Unavailable(e) = self {
                    tracing::debug!("{} failed: {:?}", action, e);
                }
                tracing::error!("{} failed: {}", action, self);
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_connection_failures_are_unavailable() {
        let err = AppError::from(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(matches!(err, AppError::Unavailable(_)));

        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn test_other_store_errors_are_database() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_user_facing_failures_are_warnings() {
        assert_eq!(AppError::NotFound("Book 3".into()).severity(), Severity::Warning);
        assert_eq!(AppError::InvalidState("loaned".into()).severity(), Severity::Warning);
        assert_eq!(AppError::NoFieldsSupplied.severity(), Severity::Warning);
        assert_eq!(AppError::Conflict("dup".into()).severity(), Severity::Error);
    }

    #[test]
    fn test_no_fields_message() {
        assert_eq!(AppError::NoFieldsSupplied.to_string(), "No fields supplied to update");
    }
}
