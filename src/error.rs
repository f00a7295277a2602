//! Error type shared by all validation passes.
//!
//! Every violated invariant is fatal: errors propagate straight out of the
//! validating call with no retry or partial-success mode.

use std::io;
use thiserror::Error;

/// Errors raised while validating a database.
#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line-oriented grammar violation inside one file.
    #[error("{message} in '{path}' {}", line_ref(*.line))]
    Parse {
        path: String,
        line: u64,
        message: &'static str,
    },

    /// A structural or cross-file inconsistency; the message carries the
    /// offending path (and line reference, where line-oriented).
    #[error("{0}")]
    Invalid(String),
}

impl ValidateError {
    pub(crate) fn parse(path: &str, line: u64, message: &'static str) -> Self {
        ValidateError::Parse {
            path: path.to_string(),
            line,
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;

/// Format a 0-based line counter as a human 1-based line reference.
///
/// The counter is incremented for display, so the maximum representable
/// counter value needs its successor spelled out explicitly to avoid
/// wrapping.
pub fn line_ref(line: u64) -> String {
    if line == u64::MAX {
        "(line 18446744073709551616)".to_string()
    } else {
        format!("(line {})", line + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ref_is_one_based() {
        assert_eq!(line_ref(0), "(line 1)");
        assert_eq!(line_ref(41), "(line 42)");
    }

    #[test]
    fn test_line_ref_max_counter() {
        assert_eq!(line_ref(u64::MAX), "(line 18446744073709551616)");
        assert_eq!(line_ref(u64::MAX - 1), "(line 18446744073709551615)");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ValidateError::parse("db/9606_sets.tsv", 2, "non-digit character detected");
        assert_eq!(
            err.to_string(),
            "non-digit character detected in 'db/9606_sets.tsv' (line 3)"
        );
    }
}
