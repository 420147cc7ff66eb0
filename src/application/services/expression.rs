//! Expression evaluation service
//!
//! Runs the pipeline normalize → character check → build → evaluate.
//!
//! Building and evaluating recurse once per tree level, so both run on a
//! worker thread whose stack is sized from the depth limit.

use std::panic;
use std::thread;

use tracing::{debug, instrument, Span};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{check_characters, evaluate, normalize, ExpressionNode, TreeBuilder};

/// Output of a successful evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Parsed expression tree
    pub tree: ExpressionNode,
    /// Value of the tree
    pub value: u64,
}

/// Stack reserved for one tree level of recursion.
const STACK_PER_LEVEL: usize = 16 * 1024;
/// Stack reserved for everything else on the worker thread.
const STACK_BASE: usize = 1024 * 1024;

/// Service for parsing and evaluating selector expressions.
#[derive(Debug, Clone, Default)]
pub struct ExpressionService {
    builder: TreeBuilder,
}

impl ExpressionService {
    /// Create a service honouring the configured depth limit.
    pub fn new(settings: &Settings) -> Self {
        Self {
            builder: TreeBuilder::new(settings.max_depth),
        }
    }

    /// Parse raw input into its expression tree.
    ///
    /// The character check runs on the whole normalized input before any
    /// structural check, so a foreign character always wins.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, raw: &str) -> ApplicationResult<ExpressionNode> {
        self.on_sized_stack(|| self.build_tree(raw))
    }

    /// Parse and evaluate raw input.
    #[instrument(level = "debug", skip(self))]
    pub fn evaluate(&self, raw: &str) -> ApplicationResult<Evaluation> {
        self.on_sized_stack(|| {
            let tree = self.build_tree(raw)?;
            let value = evaluate(&tree)?;
            debug!("evaluate: value={}", value);
            Ok(Evaluation { tree, value })
        })
    }

    /// Stack size of the worker thread for this service's depth limit.
    pub fn stack_size(&self) -> usize {
        STACK_BASE + self.builder.max_depth() * STACK_PER_LEVEL
    }

    fn build_tree(&self, raw: &str) -> ApplicationResult<ExpressionNode> {
        let normalized = normalize(raw);
        debug!("parse: normalized={}", normalized);
        check_characters(&normalized)?;
        let tree = self.builder.build(&normalized)?;
        debug!("parse: tree={}", tree);
        Ok(tree)
    }

    /// Run `job` on a scoped thread with [`Self::stack_size`] bytes of stack.
    ///
    /// A panic in `job` is resumed on the calling thread.
    fn on_sized_stack<T, F>(&self, job: F) -> ApplicationResult<T>
    where
        T: Send,
        F: FnOnce() -> ApplicationResult<T> + Send,
    {
        let span = Span::current();
        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("minmax-eval".into())
                .stack_size(self.stack_size())
                .spawn_scoped(scope, move || span.in_scope(job))
                .with_context("spawn evaluation thread")?;
            worker
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))
        })
    }
}
