//! Error taxonomy for evaluation routines
//!
//! Degenerate ratios (zero denominators) are not errors: they evaluate to
//! `0.0` through [`crate::models::ratio`]. Everything here is a caller
//! mistake or a renderer failure.

use thiserror::Error;

/// Errors that can occur while evaluating or rendering
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Shape mismatch in {what}: {left} vs {right}")]
    ShapeMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error("Start index {idx} out of range for histogram of {len} bins")]
    IndexOutOfRange { idx: usize, len: usize },

    #[error("Malformed probability table: row {row} has {width} columns, expected 2")]
    MalformedShape { row: usize, width: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub(crate) fn shape(what: impl Into<String>, left: usize, right: usize) -> Self {
        EvalError::ShapeMismatch {
            what: what.into(),
            left,
            right,
        }
    }
}
