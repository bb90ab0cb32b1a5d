//! Error types for mytensor

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using mytensor's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tensor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Data length or operand shape does not match
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Multi-index length does not fit the tensor rank
    #[error("Multi-index of length {got} does not fit a tensor with {ndim} dimensions")]
    IndexRankMismatch {
        /// Number of dimensions of the indexed tensor
        ndim: usize,
        /// Length of the supplied multi-index
        got: usize,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index, as supplied (may be negative)
        index: isize,
        /// Size of the dimension
        size: usize,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Raw data tagged with a different element type
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Element type of the tensor
        expected: DType,
        /// Element type of the supplied data
        got: DType,
    },

    /// Tensor is not contiguous when contiguous memory is required
    #[error("Operation requires contiguous tensor")]
    NotContiguous,

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
