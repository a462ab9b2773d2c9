//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid leader data in {origin} at line {line}, column {column}: {message}")]
    InvalidInput {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("render failed: {message}")]
    Render { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
