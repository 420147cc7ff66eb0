//! Bracket every operand so that operands and compound sub-expressions look alike.

use tracing::{instrument, trace};

/// Wrap the input in one outer bracket pair and every maximal digit run in its own.
///
/// `(1&2)@3` becomes `(((1)&(2))@(3))`. Never fails; characters outside the
/// allowed set are passed through for the character check to reject.
#[instrument(level = "trace")]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 3 + 2);
    let mut in_digits = false;

    out.push('(');
    for c in raw.chars() {
        let is_digit = c.is_ascii_digit();
        if is_digit && !in_digits {
            out.push('(');
        } else if !is_digit && in_digits {
            out.push(')');
        }
        in_digits = is_digit;
        out.push(c);
    }
    if in_digits {
        out.push(')');
    }
    out.push(')');

    trace!("normalized: {}", out);
    out
}
