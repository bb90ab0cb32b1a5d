//! Core Tensor type

use super::index::{MultiIndex, TensorData};
use super::{Layout, Storage, StridedIter};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;
use tracing::{debug, trace};

/// N-dimensional array with strided, shareable storage
///
/// `Tensor` consists of:
/// - **Storage**: Reference-counted element buffer
/// - **Layout**: Shape, strides, and offset defining the view into storage
///
/// # Views
///
/// Indexing (`get`) and operations like `transpose`, `narrow`, and `reshape`
/// create new tensors that share the same underlying storage. A write through
/// any of them is visible through all of them:
///
/// ```
/// use mytensor::prelude::*;
///
/// let t = Tensor::<f64>::arange(&[4, 6]);
/// let s = t.get((2, 3))?;
/// s.set(0, 42.0)?;
/// assert_eq!(t.get((2, 3))?.flatten(), [42.0]);
/// # Ok::<(), mytensor::error::Error>(())
/// ```
///
/// `Clone` produces another handle to the same storage; use [`Tensor::copy`]
/// for an independent deep copy.
pub struct Tensor<T: Element = f64> {
    storage: Storage<T>,
    layout: Layout,
}

impl<T: Element> Tensor<T> {
    /// Create a tensor from storage and layout
    ///
    /// The caller must ensure every position addressed by `layout` lies
    /// within `storage`.
    pub fn from_parts(storage: Storage<T>, layout: Layout) -> Self {
        debug_assert!(
            StridedIter::new(&layout)
                .max()
                .is_none_or(|pos| pos < storage.len()),
            "layout {layout:?} exceeds storage of {} elements",
            storage.len()
        );
        Self { storage, layout }
    }

    fn checked_layout(shape: &[usize]) -> Result<Layout> {
        Layout::try_contiguous(shape).ok_or_else(|| {
            Error::invalid_argument("shape", format!("element count of {shape:?} overflows"))
        })
    }

    fn view_of(&self, layout: Layout) -> Self {
        trace!(shape = ?layout.shape(), offset = layout.offset(), "created tensor view");
        Self {
            storage: self.storage.clone(),
            layout,
        }
    }

    /// Create a zero-filled tensor
    ///
    /// `size()` equals the product of `shape`, except that an empty shape
    /// yields an empty tensor. For the `0, 1, 2, ...` fill that the Python
    /// package uses when no data is given, see [`Tensor::arange`].
    ///
    /// # Panics
    ///
    /// Panics if the element count of `shape` cannot be allocated. Use
    /// [`Tensor::from_vec`] to validate untrusted shapes.
    pub fn zeros(shape: &[usize]) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            storage: Storage::zeroed(layout.elem_count()),
            layout,
        }
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    /// Create a tensor filled with a constant value
    pub fn full(shape: &[usize], value: T) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            storage: Storage::from_vec(vec![value; layout.elem_count()]),
            layout,
        }
    }

    /// Create a tensor holding `0, 1, 2, ...` in row-major order
    ///
    /// This is the fill used when the Python package constructs a tensor
    /// from a shape alone.
    pub fn arange(shape: &[usize]) -> Self {
        let layout = Layout::contiguous(shape);
        let data = (0..layout.elem_count())
            .map(|i| T::from_f64(i as f64))
            .collect();
        Self {
            storage: Storage::from_vec(data),
            layout,
        }
    }

    /// Create a rank-1 tensor from a vector
    pub fn vector(data: Vec<T>) -> Self {
        let layout = Layout::contiguous(&[data.len()]);
        Self {
            storage: Storage::from_vec(data),
            layout,
        }
    }

    /// Create a tensor from a shape and flat row-major data
    ///
    /// `data` may be a single element, which is treated as a one-element
    /// sequence. Returns an error if the number of elements does not match
    /// the size implied by `shape`.
    ///
    /// # Example
    ///
    /// ```
    /// use mytensor::prelude::*;
    ///
    /// let t = Tensor::<f64>::from_data(&[2, 2], [1.0, 2.0, 3.0, 4.0])?;
    /// assert_eq!(t.at((1, 0))?, 3.0);
    ///
    /// let one = Tensor::<f64>::from_data(&[1], 7.0)?;
    /// assert_eq!(one.item()?, 7.0);
    /// # Ok::<(), mytensor::error::Error>(())
    /// ```
    pub fn from_data(shape: &[usize], data: impl Into<TensorData<T>>) -> Result<Self> {
        Self::from_vec(shape, data.into().into_vec())
    }

    /// Create a tensor from a shape and an owned row-major buffer
    ///
    /// Returns an error if the element count of `shape` overflows.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let layout = Self::checked_layout(shape)?;
        if data.len() != layout.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        Ok(Self {
            storage: Storage::from_vec(data),
            layout,
        })
    }

    /// Create a tensor from a shape and a row-major slice (copied)
    pub fn from_slice(shape: &[usize], data: &[T]) -> Result<Self> {
        Self::from_vec(shape, data.to_vec())
    }

    /// Create a tensor from raw native-endian element bytes
    ///
    /// `dtype` must match `T`, and `bytes` must hold exactly `size()`
    /// elements.
    pub fn from_bytes(shape: &[usize], dtype: DType, bytes: &[u8]) -> Result<Self> {
        if dtype != T::DTYPE {
            return Err(Error::DTypeMismatch {
                expected: T::DTYPE,
                got: dtype,
            });
        }
        let elem_size = dtype.size_in_bytes();
        if bytes.len() % elem_size != 0 {
            return Err(Error::invalid_argument(
                "bytes",
                format!(
                    "length {} is not a multiple of the {dtype} element size {elem_size}",
                    bytes.len()
                ),
            ));
        }

        Self::from_vec(shape, bytemuck::pod_collect_to_vec(bytes))
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the offset of the first element in storage
    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements (0 for a rank-0 tensor)
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn dim(&self, dim: isize) -> Option<usize> {
        self.layout.dim(dim)
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Check if the tensor's elements are contiguous in storage
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check whether two tensors alias the same storage
    #[inline]
    pub fn shares_storage(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    // ===== Indexing =====

    /// Index into the tensor, returning a view
    ///
    /// `idx` is a scalar or a sequence of indices for the leading
    /// dimensions. A scalar is treated as a one-element sequence. Indexing
    /// every dimension yields a one-element view of shape `[1]`; indexing
    /// fewer yields the sub-tensor over the remaining dimensions.
    ///
    /// The result aliases this tensor's storage.
    pub fn get(&self, idx: impl Into<MultiIndex>) -> Result<Self> {
        let idx = idx.into();
        let layout = self.layout.select(&idx)?;
        Ok(self.view_of(layout))
    }

    /// Write `value` to every element selected by `idx`
    ///
    /// With a full index this writes a single element. The write is visible
    /// through every tensor sharing this storage.
    pub fn set(&self, idx: impl Into<MultiIndex>, value: T) -> Result<()> {
        self.get(idx)?.fill(value);
        Ok(())
    }

    /// Read the element at a full multi-index
    pub fn at(&self, idx: impl Into<MultiIndex>) -> Result<T> {
        let idx = idx.into();
        if idx.len() != self.ndim() {
            return Err(Error::IndexRankMismatch {
                ndim: self.ndim(),
                got: idx.len(),
            });
        }
        self.get(idx)?.item()
    }

    /// Extract the value of a single-element tensor
    pub fn item(&self) -> Result<T> {
        if self.size() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        let pos = self.layout.offset();
        Ok(self.storage.read()[pos])
    }

    /// Copy `src` into the region selected by `idx`
    ///
    /// `src` is broadcast to the region's shape. `src` may alias this tensor;
    /// it is read in full before anything is written.
    pub fn assign(&self, idx: impl Into<MultiIndex>, src: &Self) -> Result<()> {
        let region = self.get(idx)?;
        let values = src.broadcast_to(region.shape())?.flatten();

        let mut data = region.storage.write();
        for (pos, value) in StridedIter::new(&region.layout).zip(values) {
            data[pos] = value;
        }
        Ok(())
    }

    /// Set every element of this view to `value`
    pub fn fill(&self, value: T) {
        let mut data = self.storage.write();
        if self.is_contiguous() {
            let start = self.layout.offset();
            data[start..start + self.size()].fill(value);
        } else {
            for pos in StridedIter::new(&self.layout) {
                data[pos] = value;
            }
        }
    }

    // ===== View Operations (Zero-Copy) =====

    /// Transpose two dimensions (zero-copy)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let new_layout = self
            .layout
            .transpose(dim0, dim1)
            .ok_or_else(|| Error::InvalidDimension {
                dim: if self.layout.normalize_dim(dim0).is_none() {
                    dim0
                } else {
                    dim1
                },
                ndim: self.ndim(),
            })?;

        Ok(self.view_of(new_layout))
    }

    /// Transpose last two dimensions (matrix transpose)
    pub fn t(&self) -> Result<Self> {
        self.transpose(-2, -1)
    }

    /// Permute dimensions (zero-copy)
    ///
    /// `dims` must be a permutation of `0..ndim`.
    ///
    /// # Example
    ///
    /// ```
    /// use mytensor::prelude::*;
    ///
    /// let t = Tensor::<f32>::zeros(&[2, 3, 4]);
    /// let p = t.permute(&[2, 0, 1])?;
    /// assert_eq!(p.shape(), &[4, 2, 3]);
    /// # Ok::<(), mytensor::error::Error>(())
    /// ```
    pub fn permute(&self, dims: &[usize]) -> Result<Self> {
        let new_layout = self.layout.permute(dims).ok_or_else(|| {
            Error::invalid_argument(
                "dims",
                format!(
                    "{dims:?} is not a permutation of 0..{} dimensions",
                    self.ndim()
                ),
            )
        })?;

        Ok(self.view_of(new_layout))
    }

    /// Narrow a dimension to `start..start + length` (zero-copy slice)
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Result<Self> {
        let dim_idx = self
            .layout
            .normalize_dim(dim)
            .ok_or(Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;

        let new_layout = self
            .layout
            .narrow(dim_idx, start, length)
            .ok_or_else(|| Error::IndexOutOfBounds {
                index: start.saturating_add(length) as isize,
                size: self.shape()[dim_idx],
            })?;

        Ok(self.view_of(new_layout))
    }

    /// Reverse the element order along a dimension (zero-copy)
    pub fn flip(&self, dim: isize) -> Result<Self> {
        let new_layout = self.layout.flip(dim).ok_or(Error::InvalidDimension {
            dim,
            ndim: self.ndim(),
        })?;

        Ok(self.view_of(new_layout))
    }

    /// Add a dimension of size 1 (zero-copy)
    pub fn unsqueeze(&self, dim: isize) -> Result<Self> {
        let new_layout = self
            .layout
            .unsqueeze(dim)
            .ok_or_else(|| Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;

        Ok(self.view_of(new_layout))
    }

    /// Reshape to a new shape (zero-copy; requires a contiguous view)
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if !self.is_contiguous() {
            return Err(Error::NotContiguous);
        }
        Self::checked_layout(shape)?;
        let new_layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;

        Ok(self.view_of(new_layout))
    }

    /// View tensor with different shape (alias for reshape)
    pub fn view(&self, shape: &[usize]) -> Result<Self> {
        self.reshape(shape)
    }

    /// Broadcast to a target shape (zero-copy, stride 0 on repeated dims)
    ///
    /// Broadcast views repeat storage slots; writing through them writes the
    /// shared slot.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        Self::checked_layout(shape)?;
        let new_layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(self.shape(), shape))?;

        Ok(self.view_of(new_layout))
    }

    // ===== Materialization =====

    /// Copy the viewed elements into a `Vec` in row-major order
    pub fn flatten(&self) -> Vec<T> {
        let data = self.storage.read();
        if self.is_contiguous() {
            let start = self.layout.offset();
            data[start..start + self.size()].to_vec()
        } else {
            StridedIter::new(&self.layout).map(|pos| data[pos]).collect()
        }
    }

    /// Deep copy into freshly allocated contiguous storage
    ///
    /// The result never aliases `self`.
    pub fn copy(&self) -> Self {
        debug!(shape = ?self.shape(), contiguous = self.is_contiguous(), "materializing tensor copy");
        Self {
            storage: Storage::from_vec(self.flatten()),
            layout: Layout::contiguous(self.shape()),
        }
    }

    /// Make tensor contiguous (copy if needed)
    ///
    /// If the tensor is already contiguous, returns a view (zero-copy).
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() {
            self.clone()
        } else {
            self.copy()
        }
    }

    /// Copy the viewed elements out as native-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.flatten()).to_vec()
    }
}

impl<T: Element> Clone for Tensor<T> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("offset", &self.offset())
            .field("dtype", &self.dtype())
            .finish()
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
