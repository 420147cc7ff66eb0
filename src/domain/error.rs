//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Message printed for character-set violations.
pub const INVALID_CHARACTERS: &str = "INVALID CHARACTERS";

/// Message printed for every structural failure.
pub const INVALID_EXPRESSION: &str = "INVALID EXPRESSION";

/// Domain errors represent malformed expressions.
/// Every one of them is terminal: the first violation aborts the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacters { character: char, position: usize },

    #[error("invalid expression: {reason}")]
    InvalidExpression { reason: String },

    #[error("malformed number: {0}")]
    MalformedNumber(String),

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl DomainError {
    /// Create a structural error with a diagnostic reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            reason: reason.into(),
        }
    }

    /// The literal message shown to the user.
    ///
    /// Only character-set violations are distinguished; a malformed number or
    /// a tripped depth guard is reported like any other structural failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCharacters { .. } => INVALID_CHARACTERS,
            Self::InvalidExpression { .. }
            | Self::MalformedNumber(_)
            | Self::NestingTooDeep { .. } => INVALID_EXPRESSION,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
