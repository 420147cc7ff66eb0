//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod expression;

pub use expression::{Evaluation, ExpressionService};
