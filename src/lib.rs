//! # mytensor
//!
//! **Strided n-dimensional tensors with zero-copy aliasing views.**
//!
//! A [`Tensor`](tensor::Tensor) is a shape/strides/offset [`Layout`](tensor::Layout)
//! over reference-counted [`Storage`](tensor::Storage). Indexing returns a view
//! that shares its parent's buffer, so writes through the view are visible
//! through the parent and vice versa.
//!
//! ## Quick Start
//!
//! ```rust
//! use mytensor::prelude::*;
//!
//! let t = Tensor::<f64>::from_data(&[4, 6], (0..24).map(|i| i as f64).collect::<Vec<_>>())?;
//! assert_eq!(t.size(), 24);
//!
//! // A scalar index is the same as a one-element index.
//! assert_eq!(t.get(2)?.flatten(), t.get([2])?.flatten());
//!
//! // Views alias the original storage.
//! let s = t.get((2, 3))?;
//! s.set(0, 42.0)?;
//! assert_eq!(t.at((2, 3))?, 42.0);
//!
//! let sum = t.try_add(&Tensor::ones(&[6]))?;
//! assert_eq!(sum.at((0, 0))?, 1.0);
//! # Ok::<(), mytensor::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded element-wise kernels for large tensors
//! - `f16`: Half-precision elements (`half::f16`, `half::bf16`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::ops::BinaryOp;
    pub use crate::tensor::{Layout, MultiIndex, Tensor, TensorData};
}
