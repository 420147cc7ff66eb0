//! Fold an expression tree to its value.

use tracing::instrument;

use crate::domain::entities::ExpressionNode;
use crate::domain::error::{DomainError, DomainResult};

/// Evaluate `node`: leaves parse their operand, operator nodes select the
/// minimum or maximum of both children.
#[instrument(level = "trace", skip_all)]
pub fn evaluate(node: &ExpressionNode) -> DomainResult<u64> {
    match node {
        ExpressionNode::Leaf { operand } => operand
            .parse::<u64>()
            .map_err(|_| DomainError::MalformedNumber(operand.clone())),
        ExpressionNode::Internal {
            operator,
            left,
            right,
        } => Ok(operator.apply(evaluate(left)?, evaluate(right)?)),
    }
}
