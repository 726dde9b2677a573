//! Errors shared by every domain service.

/// Failure of a service operation, mapped onto an HTTP status by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Caller is known but lacks the capability
    #[error("{0}")]
    Forbidden(String),

    /// Credential missing, invalid, or rejected by the identity provider
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unprocessable(String),

    /// A collaborator is not configured or not reachable
    #[error("{0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// True when the statement was rejected by a unique index.
pub fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
