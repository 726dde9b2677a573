//! Process-level error type shared by startup and infrastructure code.
//!
//! Request-scoped failures use the service layer's own error enum and are
//! converted to HTTP responses at the API boundary; `AppError` only covers
//! things that stop the server from starting or running.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(BoxError),

    #[error("Migration error: {0}")]
    Migration(BoxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
