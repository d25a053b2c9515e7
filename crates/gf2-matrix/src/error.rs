//! Error type shared by every operation in the crate.

use thiserror::Error;

/// Invalid-operand and generation-policy failures.
///
/// Singular matrices and linearly dependent rows are not errors; those are
/// reported through `Option`/`bool` results.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A dimension was not a multiple of eight bits.
    #[error("dimension {bits} is not a multiple of 8")]
    UnalignedDimension {
        /// Requested size in bits.
        bits: usize,
    },
    /// Two rows combined element-wise had different lengths.
    #[error("row length mismatch: {left} bits vs {right} bits")]
    LengthMismatch {
        /// Length of the left operand in bits.
        left: usize,
        /// Length of the right operand in bits.
        right: usize,
    },
    /// Two matrices (or a matrix and a vector) had incompatible shapes.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// `(rows, cols)` of the left operand.
        left: (usize, usize),
        /// `(rows, cols)` of the right operand.
        right: (usize, usize),
    },
    /// The operation requires a square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NonSquare {
        /// Row count.
        rows: usize,
        /// Row width in bits.
        cols: usize,
    },
    /// Rows supplied to a matrix constructor had different widths.
    #[error("row {row} has {actual} bits, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A bit index was past the end of a row.
    #[error("bit index {index} out of range for {len}-bit row")]
    BitOutOfRange {
        /// Requested index.
        index: usize,
        /// Row length in bits.
        len: usize,
    },
    /// The incremental builder already holds a full basis.
    #[error("incremental matrix of dimension {dimension} is already fully defined")]
    AlreadyComplete {
        /// Target dimension of the builder.
        dimension: usize,
    },
    /// The incremental builder does not yet hold a full basis.
    #[error("incremental matrix has rank {rank} of {dimension}")]
    Incomplete {
        /// Current rank.
        rank: usize,
        /// Target dimension of the builder.
        dimension: usize,
    },
    /// Rejection sampling gave up after the configured number of draws.
    #[error("no invertible matrix found after {attempts} attempts")]
    RetryLimitExceeded {
        /// Number of whole-matrix draws made.
        attempts: usize,
    },
    /// Hex input could not be decoded into a row.
    #[error("invalid hex row: {0}")]
    InvalidHex(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = MatrixError> = core::result::Result<T, E>;

pub(crate) fn check_aligned(bits: usize) -> Result<()> {
    if bits % 8 != 0 {
        return Err(MatrixError::UnalignedDimension { bits });
    }
    Ok(())
}
