//! Expression tree builder.
//!
//! Precedence is decided by bracket nesting alone: the operator joining the
//! shallowest siblings becomes the root and is therefore evaluated last.
//! Siblings on the same level with no brackets between them are grouped
//! strictly left to right.

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::census::{compute_sub_expressions, into_split_siblings};
use crate::domain::entities::{is_operator, ExpressionNode, Operator, SubExpressionSpan};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::validator::check_structure;

/// Default limit on the depth of the built tree.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Largest depth limit a builder accepts.
pub const MAX_DEPTH_CEILING: usize = 4096;

/// Builds expression trees from normalized, character-checked expressions.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TreeBuilder {
    /// Limits above [`MAX_DEPTH_CEILING`] are lowered to it.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_CEILING),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build the tree denoted by `expr`.
    ///
    /// `expr` is expected to be normalized (see [`crate::domain::normalize`]),
    /// so that every operand is itself a bracketed sub-expression.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, expr: &str) -> DomainResult<ExpressionNode> {
        self.build_at(expr, 1)
    }

    /// `level` is the tree depth the returned node will occupy.
    fn build_at(&self, expr: &str, level: usize) -> DomainResult<ExpressionNode> {
        if level > self.max_depth {
            return Err(DomainError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        check_structure(expr)?;
        let census = compute_sub_expressions(expr)?;

        if !expr.chars().any(is_operator) {
            return Self::leaf(expr);
        }

        // The census is dropped here; only the siblings are held while recursing.
        let (depth, siblings) = into_split_siblings(census)
            .ok_or_else(|| DomainError::invalid(format!("no splittable depth in {}", expr)))?;
        let operators = Self::joining_operators(expr, &siblings)?;
        debug!(
            "split {} at depth {} into {} siblings",
            expr,
            depth,
            siblings.len()
        );

        // S1 op S2 op S3 ... folds to (((S1 op S2) op S3) ...); the leftmost
        // pair sits deepest in the resulting chain.
        let count = siblings.len();
        let mut node = self.build_at(siblings[0].slice(expr), level + count - 1)?;
        for (i, (&operator, span)) in operators.iter().zip(&siblings[1..]).enumerate() {
            let right = self.build_at(span.slice(expr), level + count - 1 - i)?;
            trace!("join {} {} {}", node, operator, right);
            node = ExpressionNode::internal(operator, node, right);
        }
        Ok(node)
    }

    /// Strip enclosing brackets and keep the digit text.
    fn leaf(expr: &str) -> DomainResult<ExpressionNode> {
        let operand = expr.trim_matches(|c: char| c == '(' || c == ')');
        if operand.is_empty() || !operand.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::invalid(format!(
                "juxtaposed operands in {}",
                expr
            )));
        }
        trace!("leaf {}", operand);
        Ok(ExpressionNode::leaf(operand))
    }

    /// The operator between each pair of consecutive siblings.
    ///
    /// Siblings must be separated by exactly one operator symbol, and nothing
    /// but brackets may surround the run of siblings.
    fn joining_operators(
        expr: &str,
        siblings: &[SubExpressionSpan],
    ) -> DomainResult<Vec<Operator>> {
        let (first, last) = match (siblings.first(), siblings.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(DomainError::invalid("no siblings to join")),
        };
        let stray = expr[..first.start].chars().any(|c| c != '(')
            || expr[last.end..].chars().any(|c| c != ')');
        if stray {
            return Err(DomainError::invalid(format!(
                "stray characters around operands in {}",
                expr
            )));
        }

        siblings
            .iter()
            .tuple_windows()
            .map(|(prev, next)| {
                let gap = &expr[prev.end..next.start];
                let mut chars = gap.chars();
                match (chars.next().and_then(Operator::from_symbol), chars.next()) {
                    (Some(operator), None) => Ok(operator),
                    _ => Err(DomainError::invalid(format!(
                        "expected one operator between operands, found {:?}",
                        gap
                    ))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalizer::normalize;
    use rstest::rstest;

    fn build(raw: &str) -> DomainResult<ExpressionNode> {
        TreeBuilder::default().build(&normalize(raw))
    }

    #[test]
    fn given_single_number_when_building_then_returns_leaf() {
        let tree = build("42").unwrap();
        assert_eq!(tree, ExpressionNode::leaf("42"));
    }

    #[test]
    fn given_redundant_brackets_when_building_then_strips_them() {
        let tree = build("((42))").unwrap();
        assert_eq!(tree, ExpressionNode::leaf("42"));
    }

    #[test]
    fn given_two_operands_when_building_then_splits_on_operator() {
        let tree = build("1&2").unwrap();
        assert_eq!(
            tree,
            ExpressionNode::internal(
                Operator::Max,
                ExpressionNode::leaf("1"),
                ExpressionNode::leaf("2")
            )
        );
    }

    #[rstest]
    #[case("(1&2)@3", "((1&2)@3)")]
    #[case("1@(2&3)", "(1@(2&3))")]
    #[case("1&2&3", "((1&2)&3)")]
    #[case("1@2&3@4", "(((1@2)&3)@4)")]
    #[case("(1@2)&(3@4)", "((1@2)&(3@4))")]
    #[case("((1&2))@3", "((1&2)@3)")]
    #[case("5@(1&2&3)", "(5@((1&2)&3))")]
    fn given_expression_when_building_then_groups_by_depth_then_left_to_right(
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(build(raw).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case::unmatched_opener("(1&2")]
    #[case::unmatched_closer("1&2)")]
    #[case::operator_before_closer("(1&)2)")]
    #[case::digit_before_opener("1(2")]
    #[case::doubled_operator("1&&2")]
    // Digits split by brackets are not concatenated into one operand.
    #[case::juxtaposed_operands("(1)(2)")]
    #[case::juxtaposed_with_operator("(1)(2)&3")]
    #[case::leading_operator("&1")]
    #[case::unbalanced_leaf("(1")]
    fn given_malformed_expression_when_building_then_fails_structurally(#[case] raw: &str) {
        assert!(matches!(
            build(raw),
            Err(DomainError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn given_operands_without_split_when_building_then_fails_instead_of_panicking() {
        // Not normalized: an operator is present but there is no bracket pair at all.
        let err = TreeBuilder::default().build("1&2").unwrap_err();
        assert!(matches!(err, DomainError::InvalidExpression { .. }));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_building_then_fails_with_depth_error() {
        let builder = TreeBuilder::new(3);
        assert!(builder.build(&normalize("1&2&3")).is_ok());

        let err = builder.build(&normalize("1&2&3&4")).unwrap_err();
        assert_eq!(err, DomainError::NestingTooDeep { limit: 3 });
    }

    #[test]
    fn given_limit_above_ceiling_when_creating_then_clamps_to_ceiling() {
        assert_eq!(TreeBuilder::new(usize::MAX).max_depth(), MAX_DEPTH_CEILING);
        assert_eq!(TreeBuilder::default().max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn given_deep_wrapping_around_wide_subtree_when_building_then_keeps_both() {
        fn balanced(leaves: std::ops::Range<u64>) -> String {
            if leaves.end - leaves.start == 1 {
                return leaves.start.to_string();
            }
            let mid = leaves.start + (leaves.end - leaves.start) / 2;
            format!("({}&{})", balanced(leaves.start..mid), balanced(mid..leaves.end))
        }
        let raw = format!("{}{}{}", "1&(".repeat(200), balanced(0..1024), ")".repeat(200));

        let tree = build(&raw).unwrap();
        assert_eq!(tree.leaf_count(), 1024 + 200);
        assert_eq!(tree.height(), 200 + 11);
    }
}
