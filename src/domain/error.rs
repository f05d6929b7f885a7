//! Domain errors

use std::fmt;

use thiserror::Error;

/// Which allow-list a rejected field name was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Sort,
    Search,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sort => write!(f, "sort"),
            Self::Search => write!(f, "search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid {kind} field: {field}")]
    InvalidField { kind: FieldKind, field: String },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Migration {0} is not applied")]
    NotApplied(String),

    #[error("Migration {version} failed: {source}")]
    MigrationFailed {
        version: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Server-side failure outside storage, e.g. hashing or token signing
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than by the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_) | Self::MigrationFailed { .. } | Self::Internal(_)
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
