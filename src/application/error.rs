//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// The domain error behind this failure, if the expression itself was at fault.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
