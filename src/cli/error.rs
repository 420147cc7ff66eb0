//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get reported to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// The rejected expression's error, if that is what went wrong.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Application(e) => e.as_domain(),
            Self::Usage(_) => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Application(ApplicationError::Domain(_)) => exitcode::DATAERR,
            Self::Application(ApplicationError::Config { .. }) => exitcode::CONFIG,
            Self::Application(ApplicationError::OperationFailed { .. }) => exitcode::IOERR,
            Self::Usage(_) => exitcode::USAGE,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
