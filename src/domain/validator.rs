//! Character-set and adjacency checks.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::entities::is_operator;
use crate::domain::error::{DomainError, DomainResult};

// `)n`, `n(`, `@)`, `&)`, `(@`, `(&`, and any two operators in a row
static ILLEGAL_ADJACENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)[0-9]|[0-9]\(|[@&]\)|\([@&]|[@&]{2}").unwrap());

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || c == '(' || c == ')' || is_operator(c)
}

/// Reject anything outside digits, brackets and the two selector symbols.
#[instrument(level = "trace")]
pub fn check_characters(expr: &str) -> DomainResult<()> {
    match expr.char_indices().find(|&(_, c)| !is_allowed(c)) {
        Some((position, character)) => {
            debug!("rejecting {:?} at {}", character, position);
            Err(DomainError::InvalidCharacters {
                character,
                position,
            })
        }
        None => Ok(()),
    }
}

/// Reject operators touching a bracket boundary, doubled operators, digits
/// touching the wrong side of a bracket, and expressions without any digit.
#[instrument(level = "trace")]
pub fn check_structure(expr: &str) -> DomainResult<()> {
    if let Some(m) = ILLEGAL_ADJACENCY.find(expr) {
        return Err(DomainError::invalid(format!(
            "illegal sequence {:?} at position {}",
            m.as_str(),
            m.start()
        )));
    }
    if !expr.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::invalid("no operand"));
    }
    Ok(())
}
