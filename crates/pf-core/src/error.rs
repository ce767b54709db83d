//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `pf-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Contradictory or out-of-range configuration.  Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `pf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
