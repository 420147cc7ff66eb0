//! Domain entities: core data structures

use std::fmt;

/// Symbol of the min-selector.
pub const MIN_SYMBOL: char = '@';
/// Symbol of the max-selector.
pub const MAX_SYMBOL: char = '&';

/// Binary selector joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `@`: the smaller of both operands
    Min,
    /// `&`: the larger of both operands
    Max,
}

impl Operator {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            MIN_SYMBOL => Some(Self::Min),
            MAX_SYMBOL => Some(Self::Max),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Min => MIN_SYMBOL,
            Self::Max => MAX_SYMBOL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    pub fn apply(self, left: u64, right: u64) -> u64 {
        match self {
            Self::Min => left.min(right),
            Self::Max => left.max(right),
        }
    }
}

/// True for either selector symbol.
pub fn is_operator(c: char) -> bool {
    Operator::from_symbol(c).is_some()
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Node of a strictly binary expression tree.
///
/// A node has either no children (a leaf holding operand text) or exactly two
/// (an operator node). The variant makes a one-child node unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionNode {
    Leaf {
        /// Decimal digits, parsed on evaluation
        operand: String,
    },
    Internal {
        operator: Operator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
}

impl ExpressionNode {
    pub fn leaf(operand: impl Into<String>) -> Self {
        Self::Leaf {
            operand: operand.into(),
        }
    }

    pub fn internal(operator: Operator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Internal {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Fully parenthesized infix form: `((1&2)@3)`.
impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { operand } => write!(f, "{}", operand),
            Self::Internal {
                operator,
                left,
                right,
            } => write!(f, "({}{}{})", left, operator, right),
        }
    }
}

/// A bracket-matched substring `[start, end)` of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubExpressionSpan {
    /// Index of the opening bracket
    pub start: usize,
    /// Index just past the closing bracket
    pub end: usize,
    /// Brackets open up to and including this span's opening bracket
    pub depth: usize,
}

impl SubExpressionSpan {
    pub fn slice<'a>(&self, expr: &'a str) -> &'a str {
        &expr[self.start..self.end]
    }
}
