//! Row-major traversal of strided layouts

use super::Layout;
use super::layout::STACK_DIMS;
use smallvec::SmallVec;

/// Iterator over the storage positions of every element in a [`Layout`]
///
/// Positions are produced in logical row-major order, so the n-th item is the
/// storage slot of the n-th element of the flattened view. Offsets are updated
/// incrementally; no per-element dot product is computed.
#[derive(Clone, Debug)]
pub struct StridedIter<'a> {
    shape: &'a [usize],
    strides: &'a [isize],
    indices: SmallVec<[usize; STACK_DIMS]>,
    pos: isize,
    remaining: usize,
}

impl<'a> StridedIter<'a> {
    /// Start a traversal at the first element of `layout`
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            shape: layout.shape(),
            strides: layout.strides(),
            indices: SmallVec::from_elem(0, layout.ndim()),
            pos: layout.offset() as isize,
            remaining: layout.elem_count(),
        }
    }
}

impl Iterator for StridedIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.pos as usize;
        self.remaining -= 1;

        if self.remaining > 0 {
            for dim in (0..self.shape.len()).rev() {
                self.indices[dim] += 1;
                self.pos += self.strides[dim];
                if self.indices[dim] < self.shape[dim] {
                    break;
                }
                self.pos -= self.strides[dim] * self.shape[dim] as isize;
                self.indices[dim] = 0;
            }
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedIter<'_> {}
