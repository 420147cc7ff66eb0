//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Evaluate min/max selector expressions whose precedence is decided by bracket nesting
///
/// `@` selects the smaller operand, `&` the larger. Without a command, one
/// expression is read from stdin and evaluated.
#[derive(Parser, Debug)]
#[command(name = "minmax")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/minmax/minmax.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Deepest expression tree to build (overrides config)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an expression and print its value
    Eval {
        /// Expression (default: first line of stdin)
        expression: Option<String>,
        /// Also print the parsed tree to stderr
        #[arg(short, long)]
        tree: bool,
    },

    /// Print the parsed expression tree without evaluating it
    Tree {
        /// Expression (default: first line of stdin)
        expression: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Create config template
    Init,

    /// Show config path
    Path,
}
