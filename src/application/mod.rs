//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic; it owns the evaluation pipeline.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use services::{Evaluation, ExpressionService};
