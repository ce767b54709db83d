//! Error types for pf-eval.

use thiserror::Error;

use pf_core::PathId;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no ground truth for path {0}")]
    MissingGroundTruth(PathId),

    #[error("{samples} samples but {results} decode results")]
    LengthMismatch { samples: usize, results: usize },
}

/// Alias for `Result<T, EvalError>`.
pub type EvalResult<T> = Result<T, EvalError>;
