//! Bracket-depth census: which bracketed sub-expressions sit at which depth.

use std::collections::BTreeMap;

use tracing::{instrument, trace};

use crate::domain::entities::SubExpressionSpan;
use crate::domain::error::{DomainError, DomainResult};

/// Depth → spans closing at that depth, in order of their closing bracket.
pub type Census = BTreeMap<usize, Vec<SubExpressionSpan>>;

/// Match every bracket pair of `expr` and group the pairs by nesting depth.
///
/// The depth of a pair is the number of brackets open when its closing bracket
/// is reached, its own opening bracket included. Unmatched brackets on either
/// side are structural errors.
#[instrument(level = "trace")]
pub fn compute_sub_expressions(expr: &str) -> DomainResult<Census> {
    let mut open: Vec<usize> = Vec::new();
    let mut census = Census::new();

    for (i, c) in expr.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                let depth = open.len();
                let start = open.pop().ok_or_else(|| {
                    DomainError::invalid(format!("unmatched closing bracket at position {}", i))
                })?;
                census.entry(depth).or_default().push(SubExpressionSpan {
                    start,
                    end: i + 1,
                    depth,
                });
            }
            _ => {}
        }
    }

    if let Some(&start) = open.last() {
        return Err(DomainError::invalid(format!(
            "unmatched opening bracket at position {}",
            start
        )));
    }

    trace!("census: {:?}", census);
    Ok(census)
}

/// Shallowest depth holding two or more sibling spans.
pub fn split_depth(census: &Census) -> Option<usize> {
    census
        .iter()
        .find(|(_, spans)| spans.len() >= 2)
        .map(|(&depth, _)| depth)
}

/// Take the shallowest sibling list out of `census`, dropping the rest.
pub fn into_split_siblings(mut census: Census) -> Option<(usize, Vec<SubExpressionSpan>)> {
    let depth = split_depth(&census)?;
    census.remove(&depth).map(|spans| (depth, spans))
}
