//! Error types for sprite construction and composition.

use thiserror::Error;

/// Errors that can occur while building or combining sprite matrices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// Matrix rows do not all have the same length.
    #[error("ragged rows: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Cell count found in that row.
        found: usize,
        /// Cell count of the first row.
        expected: usize,
    },

    /// Horizontal concatenation requires equal row counts.
    #[error("row count mismatch: left has {left} rows, right has {right}")]
    RowCountMismatch {
        /// Rows in the left matrix.
        left: usize,
        /// Rows in the right matrix.
        right: usize,
    },

    /// A matrix dimension was zero where content is required.
    #[error("empty matrix: width and height must both be non-zero")]
    EmptyMatrix,

    /// A pixel string could not be parsed.
    #[error("invalid pixel literal: {0:?}")]
    InvalidPixel(String),
}

/// Result type for sprite operations.
pub type SpriteResult<T> = Result<T, SpriteError>;
