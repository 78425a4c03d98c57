use thiserror::Error;

use crate::linalg::MatrixError;

/// Failures raised by the pipeline stages. None of them are retried since
/// every stage is deterministic over in-memory data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PcaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("no training observations to match against")]
    EmptyDataset,
    #[error("eigen-decomposition failed: {0}")]
    DecompositionFailure(String),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

pub type Result<T, E = PcaError> = std::result::Result<T, E>;
