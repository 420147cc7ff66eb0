//! Domain layer: expression entities, parsing and evaluation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod census;
pub mod entities;
pub mod error;
pub mod evaluator;
pub mod normalizer;
pub mod tree_traits;
pub mod validator;

pub use builder::{TreeBuilder, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
pub use census::{compute_sub_expressions, into_split_siblings, split_depth, Census};
pub use entities::*;
pub use error::{DomainError, DomainResult, INVALID_CHARACTERS, INVALID_EXPRESSION};
pub use evaluator::evaluate;
pub use normalizer::normalize;
pub use tree_traits::TreeNodeConvert;
pub use validator::{check_characters, check_structure};
