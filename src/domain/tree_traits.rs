use termtree::Tree;

use crate::domain::entities::ExpressionNode;

/// Conversion into a printable `termtree` representation.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for ExpressionNode {
    fn to_tree_string(&self) -> Tree<String> {
        match self {
            ExpressionNode::Leaf { operand } => Tree::new(operand.clone()),
            ExpressionNode::Internal {
                operator,
                left,
                right,
            } => Tree::new(format!("{} ({})", operator.name(), operator))
                .with_leaves([left.to_tree_string(), right.to_tree_string()]),
        }
    }
}
