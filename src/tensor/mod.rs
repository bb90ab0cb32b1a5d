//! Tensor types and operations
//!
//! This module provides the core `Tensor` type, an n-dimensional array whose
//! elements live in reference-counted storage addressed through a strided
//! layout.

mod core;
mod index;
mod iter;
mod layout;
mod storage;

pub use self::core::Tensor;
pub use index::{MultiIndex, TensorData};
pub use iter::StridedIter;
pub use layout::{Layout, Shape, Strides, broadcast_shapes};
pub use storage::Storage;
