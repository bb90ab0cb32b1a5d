//! Storage: host memory with Arc-based sharing

use crate::dtype::{DType, Element};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Element buffer shared by a tensor and all views derived from it
///
/// Cloning a `Storage` increments the reference count; the buffer is freed
/// when the last tensor referencing it is dropped. Writes through any handle
/// are visible through every other handle.
///
/// The buffer length is fixed at allocation.
pub struct Storage<T: Element> {
    inner: Arc<StorageInner<T>>,
}

struct StorageInner<T: Element> {
    data: RwLock<Vec<T>>,
    len: usize,
}

impl<T: Element> Storage<T> {
    /// Take ownership of an existing buffer
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        trace!(len, dtype = %T::DTYPE, "allocated tensor storage");
        Self {
            inner: Arc::new(StorageInner {
                data: RwLock::new(data),
                len,
            }),
        }
    }

    /// Allocate `len` zeroed elements
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::zero(); len])
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.inner.len * T::DTYPE.size_in_bytes()
    }

    /// Get the reference count
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if this is the only reference
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Check whether two handles refer to the same buffer
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Lock the buffer for reading
    ///
    /// A lock poisoned by a panicking writer is recovered: element buffers
    /// have no invariants spanning more than one element.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner
            .data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the buffer for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy the whole buffer out
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }
}

impl<T: Element> Clone for Storage<T> {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> std::fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.inner.len)
            .field("dtype", &T::DTYPE)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
