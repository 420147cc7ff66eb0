//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print section header (cyan bold) to stderr
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().cyan().bold());
}

/// Print diagnostic text (no color) to stderr, keeping stdout clean
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    eprint!("{}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a bare result or rejection message: no color, no trailing newline
pub fn bare(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{}", msg);
    std::io::stdout().flush().ok();
}
