//! # Filter Compilation Errors
//!
//! Error types raised while compiling a raw filter tree.

use thiserror::Error;

/// Result type for filter compilation
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised by the operator compiler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Regex operand does not compile
    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// Glob operand does not compile
    #[error("Invalid glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// Operator token outside the supported set
    #[error("Unknown operator '{op}' at '{path}'")]
    UnknownOperator { op: String, path: String },

    /// Operand has the wrong shape for its operator
    #[error("Invalid operand for '{op}' at '{path}': expected {expected}")]
    InvalidOperand {
        op: String,
        path: String,
        expected: &'static str,
    },

    /// Object mixes path continuations with operators
    #[error("Filter node at '{path}' mixes field paths and operators")]
    MixedNode { path: String },

    /// Filter is not a usable tree
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl FilterError {
    /// Returns the offending pattern for pattern compilation failures
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FilterError::InvalidRegex { pattern, .. } | FilterError::InvalidGlob { pattern, .. } => {
                Some(pattern)
            }
            _ => None,
        }
    }
}
