//! Database error types and their mapping onto application errors

use crate::error::{AppError, AppErrorKind, InfrastructureError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    /// Pool exhausted, connection refused or dropped
    ConnectionError { message: String },
    /// Row lookup that must succeed returned nothing
    NotFound { entity: String, id: String },
    /// Unique or foreign key constraint violation
    ConstraintViolation { message: String },
    /// Serialization failure or deadlock; safe to retry
    TransactionConflict { message: String },
    QueryError { message: String },
    Unknown { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind) -> Self {
        Self { kind }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(DatabaseErrorKind::NotFound {
            entity: entity.into(),
            id: id.into(),
        })
    }

    /// Classify a sqlx error
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::RowNotFound => DatabaseErrorKind::NotFound {
                entity: "row".to_string(),
                id: String::new(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseErrorKind::ConnectionError {
                    message: err.to_string(),
                }
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation, foreign_key_violation
                Some("23505") | Some("23503") => DatabaseErrorKind::ConstraintViolation {
                    message: db_err.message().to_string(),
                },
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => DatabaseErrorKind::TransactionConflict {
                    message: db_err.message().to_string(),
                },
                _ => DatabaseErrorKind::QueryError {
                    message: db_err.message().to_string(),
                },
            },
            _ => DatabaseErrorKind::Unknown {
                message: err.to_string(),
            },
        };

        Self { kind }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::ConnectionError { .. } | DatabaseErrorKind::TransactionConflict { .. }
        )
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DatabaseErrorKind::ConnectionError { message } => {
                write!(f, "Database connection error: {}", message)
            }
            DatabaseErrorKind::NotFound { entity, id } => {
                write!(f, "{} '{}' not found", entity, id)
            }
            DatabaseErrorKind::ConstraintViolation { message } => {
                write!(f, "Constraint violation: {}", message)
            }
            DatabaseErrorKind::TransactionConflict { message } => {
                write!(f, "Transaction conflict: {}", message)
            }
            DatabaseErrorKind::QueryError { message } => write!(f, "Query error: {}", message),
            DatabaseErrorKind::Unknown { message } => write!(f, "Database error: {}", message),
        }
    }
}

impl std::error::Error for DatabaseError {}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err.kind {
            DatabaseErrorKind::NotFound { id, .. } => AppError::not_found(id),
            _ => AppError::new(AppErrorKind::Infrastructure(InfrastructureError::Database {
                is_retryable: err.is_retryable(),
                message: err.to_string(),
            })),
        }
    }
}
