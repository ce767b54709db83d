//! Sample-subsystem error types.

use thiserror::Error;

use pf_core::{CoreError, PathId};
use pf_network::IntegrityError;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("configuration error: {0}")]
    Core(#[from] CoreError),

    #[error("input integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("duplicate ground-truth path id {0}")]
    DuplicatePath(PathId),

    #[error("ground-truth parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SampleResult<T> = Result<T, SampleError>;
