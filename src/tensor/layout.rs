//! Layout: shape, strides, and offset for tensor memory layout

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed to support negative strides (flip)
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Layout describes how a tensor's logical elements map onto its storage
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// A rank-0 layout is degenerate: it holds no elements.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use mytensor::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::compute_contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            strides,
            offset,
        }
    }

    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride = stride.saturating_mul(isize::try_from(dim).unwrap_or(isize::MAX));
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset of the first element in storage
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    ///
    /// Product of the shape, except that a rank-0 layout has no elements.
    /// Saturates at `usize::MAX` for shapes rejected by
    /// [`Layout::checked_elem_count`].
    #[inline]
    pub fn elem_count(&self) -> usize {
        Self::checked_elem_count(&self.shape).unwrap_or(usize::MAX)
    }

    /// Element count of `shape`, or `None` if it is not addressable
    ///
    /// A shape is addressable when the product of its non-zero dimensions
    /// fits in `isize`, so every contiguous stride and offset does too.
    pub fn checked_elem_count(shape: &[usize]) -> Option<usize> {
        if shape.is_empty() {
            return Some(0);
        }

        let mut span = 1usize;
        for &dim in shape.iter().filter(|&&d| d != 0) {
            span = span
                .checked_mul(dim)
                .filter(|&n| n <= isize::MAX as usize)?;
        }

        Some(if shape.contains(&0) { 0 } else { span })
    }

    /// Contiguous layout for `shape`, or `None` if the shape is not addressable
    pub fn try_contiguous(shape: &[usize]) -> Option<Self> {
        Self::checked_elem_count(shape)?;
        Some(Self::contiguous(shape))
    }

    /// Check if the viewed elements are laid out row-major without gaps
    ///
    /// Strides of size-1 dimensions are ignored; the offset may be non-zero.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if dim != 1 && stride != expected {
                return false;
            }
            expected = expected.saturating_mul(isize::try_from(dim).unwrap_or(isize::MAX));
        }
        true
    }

    /// Get size along a specific dimension
    ///
    /// Supports negative indexing: -1 is the last dimension
    pub fn dim(&self, d: isize) -> Option<usize> {
        let idx = self.normalize_dim(d)?;
        Some(self.shape[idx])
    }

    /// Get stride along a specific dimension
    pub fn stride(&self, d: isize) -> Option<isize> {
        let idx = self.normalize_dim(d)?;
        Some(self.strides[idx])
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Compute the storage position for a full multi-index
    ///
    /// Returns `None` if the index length differs from the rank or any
    /// index is out of bounds.
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() || self.elem_count() == 0 {
            return None;
        }

        let mut linear = self.offset as isize;
        for ((&idx, &dim), &stride) in indices.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim {
                return None;
            }
            linear += idx as isize * stride;
        }

        Some(linear as usize)
    }

    /// Layout of the view selected by a leading multi-index
    ///
    /// Each index fixes one leading dimension; fixed dimensions are removed
    /// and folded into the offset. Negative indices count from the end of
    /// their dimension. Fixing every dimension yields a one-element layout
    /// of shape `[1]`.
    pub fn select(&self, indices: &[isize]) -> Result<Self> {
        if indices.len() > self.ndim() {
            return Err(Error::IndexRankMismatch {
                ndim: self.ndim(),
                got: indices.len(),
            });
        }

        let mut offset = self.offset as isize;
        for ((&raw, &dim), &stride) in indices.iter().zip(&self.shape).zip(&self.strides) {
            let size = isize::try_from(dim).unwrap_or(isize::MAX);
            let idx = if raw < 0 { raw + size } else { raw };
            if idx < 0 || idx >= size {
                return Err(Error::IndexOutOfBounds {
                    index: raw,
                    size: dim,
                });
            }
            offset += idx * stride;
        }

        let k = indices.len();
        if k == self.ndim() && k > 0 {
            return Ok(Self::new(
                SmallVec::from_slice(&[1]),
                SmallVec::from_slice(&[1]),
                offset as usize,
            ));
        }

        Ok(Self::new(
            SmallVec::from_slice(&self.shape[k..]),
            SmallVec::from_slice(&self.strides[k..]),
            offset as usize,
        ))
    }

    /// Create a transposed layout (swap two dimensions)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();

        new_shape.swap(d0, d1);
        new_strides.swap(d0, d1);

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Reorder dimensions; `dims` must be a permutation of `0..ndim`
    pub fn permute(&self, dims: &[usize]) -> Option<Self> {
        if dims.len() != self.ndim() {
            return None;
        }

        let mut seen: SmallVec<[bool; STACK_DIMS]> = SmallVec::from_elem(false, dims.len());
        let mut new_shape = Shape::with_capacity(dims.len());
        let mut new_strides = Strides::with_capacity(dims.len());
        for &d in dims {
            if d >= self.ndim() || seen[d] {
                return None;
            }
            seen[d] = true;
            new_shape.push(self.shape[d]);
            new_strides.push(self.strides[d]);
        }

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Restrict dimension `dim` to `start..start + length`
    pub fn narrow(&self, dim: usize, start: usize, length: usize) -> Option<Self> {
        let size = *self.shape.get(dim)?;
        if start.checked_add(length)? > size {
            return None;
        }

        let mut new_shape = self.shape.clone();
        new_shape[dim] = length;
        // an empty slice addresses nothing, so it keeps the parent's offset
        let offset = if length == 0 {
            self.offset
        } else {
            (self.offset as isize + start as isize * self.strides[dim]) as usize
        };

        Some(Self::new(new_shape, self.strides.clone(), offset))
    }

    /// Reverse the order of elements along a dimension
    pub fn flip(&self, dim: isize) -> Option<Self> {
        let d = self.normalize_dim(dim)?;
        let size = self.shape[d];

        let mut new_strides = self.strides.clone();
        let mut offset = self.offset as isize;
        if size > 0 {
            offset += (size as isize - 1) * self.strides[d];
        }
        new_strides[d] = -new_strides[d];

        Some(Self::new(self.shape.clone(), new_strides, offset as usize))
    }

    /// Create an unsqueezed layout (add dimension of size 1)
    ///
    /// Returns None for a rank-0 layout, which holds no element to expose.
    pub fn unsqueeze(&self, dim: isize) -> Option<Self> {
        let ndim = self.ndim();
        if ndim == 0 {
            return None;
        }
        let idx = if dim < 0 { ndim as isize + dim + 1 } else { dim };
        if idx < 0 || idx as usize > ndim {
            return None;
        }
        let idx = idx as usize;

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();

        let new_stride = if idx < ndim {
            new_strides[idx] * new_shape[idx] as isize
        } else {
            1
        };

        new_shape.insert(idx, 1);
        new_strides.insert(idx, new_stride);

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Create a reshaped layout (if contiguous)
    ///
    /// Returns None if the layout is not contiguous or element counts differ
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        if !self.is_contiguous() {
            return None;
        }

        let target = Self::try_contiguous(new_shape)?;
        if target.elem_count() != self.elem_count() {
            return None;
        }

        Some(Self {
            offset: self.offset,
            ..target
        })
    }

    /// Create a broadcast layout to a target shape
    ///
    /// Returns None if shapes are not broadcastable
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        if target.len() < self.ndim() || (self.ndim() == 0 && !target.is_empty()) {
            return None;
        }
        Self::checked_elem_count(target)?;

        let mut new_shape = Shape::with_capacity(target.len());
        let mut new_strides = Strides::with_capacity(target.len());

        let pad = target.len() - self.ndim();
        for &t in &target[..pad] {
            new_shape.push(t);
            new_strides.push(0);
        }

        for ((&s, &st), &t) in self
            .shape
            .iter()
            .zip(self.strides.iter())
            .zip(&target[pad..])
        {
            if s == t {
                new_shape.push(t);
                new_strides.push(st);
            } else if s == 1 {
                new_shape.push(t);
                new_strides.push(0);
            } else {
                return None;
            }
        }

        Some(Self::new(new_shape, new_strides, self.offset))
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}

/// Compute the broadcast shape of two shapes (right-aligned, NumPy rules)
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Shape> {
    let max_ndim = a.len().max(b.len());
    let mut result = Shape::with_capacity(max_ndim);

    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if a_dim == b_dim || b_dim == 1 {
            result.push(a_dim);
        } else if a_dim == 1 {
            result.push(b_dim);
        } else {
            return None;
        }
    }

    result.reverse();
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_layout() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.shape(), &[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.elem_count(), 24);
        assert!(layout.is_contiguous());
    }

    #[test]
    fn test_elem_count_degenerate_shapes() {
        assert_eq!(Layout::contiguous(&[]).elem_count(), 0);
        assert_eq!(Layout::contiguous(&[0]).elem_count(), 0);
        assert_eq!(Layout::contiguous(&[13]).elem_count(), 13);
        assert_eq!(Layout::contiguous(&[4, 5]).elem_count(), 20);
    }

    #[test]
    fn test_checked_elem_count_overflow() {
        assert_eq!(Layout::checked_elem_count(&[4, 5]), Some(20));
        assert_eq!(Layout::checked_elem_count(&[1 << 63, 2]), None);
        assert_eq!(Layout::checked_elem_count(&[usize::MAX]), None);
        // a zero dimension does not hide an unaddressable stride
        assert_eq!(Layout::checked_elem_count(&[0, 1 << 62, 4]), None);
        assert_eq!(Layout::checked_elem_count(&[0, 1 << 40]), Some(0));
        assert!(Layout::try_contiguous(&[1 << 63, 2]).is_none());
        assert!(Layout::contiguous(&[1]).reshape(&[1 << 63, 2]).is_none());
        assert!(Layout::contiguous(&[1]).broadcast_to(&[1 << 63, 2]).is_none());
    }

    #[test]
    fn test_select_huge_dimension() {
        let layout = Layout::new(
            SmallVec::from_slice(&[usize::MAX]),
            SmallVec::from_slice(&[1]),
            0,
        );
        assert_eq!(layout.select(&[1]).unwrap().offset(), 1);
    }

    #[test]
    fn test_index() {
        let layout = Layout::contiguous(&[2, 3]);
        assert_eq!(layout.index(&[0, 0]), Some(0));
        assert_eq!(layout.index(&[0, 2]), Some(2));
        assert_eq!(layout.index(&[1, 0]), Some(3));
        assert_eq!(layout.index(&[1, 2]), Some(5));
        assert_eq!(layout.index(&[2, 0]), None);
        assert_eq!(layout.index(&[1]), None);
        assert_eq!(Layout::contiguous(&[]).index(&[]), None);
    }

    #[test]
    fn test_select_full_index() {
        let layout = Layout::contiguous(&[4, 6]);
        let sel = layout.select(&[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[1]);
        assert_eq!(sel.offset(), 15);
        assert_eq!(sel.elem_count(), 1);
    }

    #[test]
    fn test_select_partial_and_negative() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        let row = layout.select(&[1]).unwrap();
        assert_eq!(row.shape(), &[3, 4]);
        assert_eq!(row.strides(), &[4, 1]);
        assert_eq!(row.offset(), 12);

        let last = layout.select(&[-1, -1]).unwrap();
        assert_eq!(last.shape(), &[4]);
        assert_eq!(last.offset(), 12 + 8);
    }

    #[test]
    fn test_select_errors() {
        let layout = Layout::contiguous(&[2, 3]);
        assert_eq!(
            layout.select(&[0, 0, 0]),
            Err(Error::IndexRankMismatch { ndim: 2, got: 3 })
        );
        assert_eq!(
            layout.select(&[0, 3]),
            Err(Error::IndexOutOfBounds { index: 3, size: 3 })
        );
        assert_eq!(
            layout.select(&[-3]),
            Err(Error::IndexOutOfBounds { index: -3, size: 2 })
        );
    }

    #[test]
    fn test_transpose() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        let transposed = layout.transpose(-1, -2).unwrap();
        assert_eq!(transposed.shape(), &[2, 4, 3]);
        assert_eq!(transposed.strides(), &[12, 1, 4]);
        assert!(!transposed.is_contiguous());
    }

    #[test]
    fn test_permute() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        let permuted = layout.permute(&[2, 0, 1]).unwrap();
        assert_eq!(permuted.shape(), &[4, 2, 3]);
        assert_eq!(permuted.strides(), &[1, 12, 4]);
        assert!(layout.permute(&[0, 0, 1]).is_none());
        assert!(layout.permute(&[0, 1]).is_none());
    }

    #[test]
    fn test_narrow_and_flip() {
        let layout = Layout::contiguous(&[4, 5]);
        let narrowed = layout.narrow(1, 1, 3).unwrap();
        assert_eq!(narrowed.shape(), &[4, 3]);
        assert_eq!(narrowed.offset(), 1);
        assert!(!narrowed.is_contiguous());
        assert!(layout.narrow(1, 3, 3).is_none());

        let flipped = layout.flip(0).unwrap();
        assert_eq!(flipped.strides(), &[-5, 1]);
        assert_eq!(flipped.offset(), 15);
        assert_eq!(flipped.index(&[0, 0]), Some(15));
        assert_eq!(flipped.index(&[3, 4]), Some(4));
    }

    #[test]
    fn test_empty_narrow_of_flipped_keeps_offset() {
        let flipped = Layout::contiguous(&[3]).flip(0).unwrap();
        assert_eq!(flipped.offset(), 2);
        let empty = flipped.narrow(0, 3, 0).unwrap();
        assert_eq!(empty.shape(), &[0]);
        assert_eq!(empty.offset(), 2);
        assert_eq!(empty.elem_count(), 0);
    }

    #[test]
    fn test_reshape_keeps_offset() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        let reshaped = layout.reshape(&[6, 4]).unwrap();
        assert_eq!(reshaped.shape(), &[6, 4]);
        assert!(reshaped.is_contiguous());

        let row = layout.select(&[1]).unwrap();
        let flat = row.reshape(&[12]).unwrap();
        assert_eq!(flat.offset(), 12);
        assert!(layout.reshape(&[5, 5]).is_none());
    }

    #[test]
    fn test_unsqueeze() {
        let layout = Layout::contiguous(&[3, 4]);
        let unsqueezed = layout.unsqueeze(0).unwrap();
        assert_eq!(unsqueezed.shape(), &[1, 3, 4]);
        let trailing = layout.unsqueeze(-1).unwrap();
        assert_eq!(trailing.shape(), &[3, 4, 1]);
        assert!(Layout::contiguous(&[]).unsqueeze(0).is_none());
    }

    #[test]
    fn test_broadcast_to() {
        let layout = Layout::contiguous(&[3, 1]);
        let b = layout.broadcast_to(&[2, 3, 4]).unwrap();
        assert_eq!(b.shape(), &[2, 3, 4]);
        assert_eq!(b.strides(), &[0, 1, 0]);
        assert!(layout.broadcast_to(&[3, 2, 2]).is_none());
    }

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(
            broadcast_shapes(&[3, 1], &[1, 4]),
            Some(SmallVec::from_slice(&[3, 4]))
        );
        assert_eq!(
            broadcast_shapes(&[2, 3, 4], &[4]),
            Some(SmallVec::from_slice(&[2, 3, 4]))
        );
        assert_eq!(broadcast_shapes(&[3], &[4]), None);
    }
}
