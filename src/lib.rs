//! minmax: evaluate expressions of non-negative integers joined by the
//! min-selector `@` and the max-selector `&`.
//!
//! The operators have no precedence of their own. The operator joining the
//! shallowest bracketed siblings is evaluated last, and siblings on the same
//! nesting level are grouped left to right:
//!
//! ```
//! use minmax::application::ExpressionService;
//!
//! let service = ExpressionService::default();
//! assert_eq!(service.evaluate("(1&2)@3").unwrap().value, 2);
//! assert_eq!(service.evaluate("1&2&3").unwrap().tree.to_string(), "((1&2)&3)");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
