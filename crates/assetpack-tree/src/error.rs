//! Error types for tree evaluation and output writing.

use thiserror::Error;

use crate::runtime::RuntimeError;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    /// Platform I/O failed while reading a source tree.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A concat header file was not present in its input tree.
    #[error("missing input file `{path}` while concatenating `{output}`")]
    MissingFile { path: String, output: String },

    /// A funnel `src_dir` does not exist and the funnel does not allow empty input.
    #[error("source directory not found: {0}")]
    MissingDirectory(String),

    /// Two merged trees produced the same path without `overwrite`.
    #[error("merge conflict at `{path}` (use overwrite to let later trees win)")]
    MergeConflict { path: String },

    /// A content filter rejected a file. The filter's own error is kept as-is.
    #[error(transparent)]
    Filter(anyhow::Error),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// Output file already exists and overwrite is disabled.
    #[error("Output exists: {0}")]
    OutputExists(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
