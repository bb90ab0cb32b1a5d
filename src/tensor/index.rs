//! Normalized indexing and constructor arguments
//!
//! Indexing accepts either a bare scalar or a sequence of indices. A scalar is
//! coerced into a one-element multi-index, so `t.get(2)`, `t.get([2])` and
//! `t.get((2,))` all select the same view. Constructor data is normalized the
//! same way: a lone element becomes a one-element sequence.

use super::layout::STACK_DIMS;
use crate::dtype::Element;
use smallvec::SmallVec;
use std::ops::Deref;

/// A multi-index: one signed index per leading dimension
///
/// Negative entries count from the end of their dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiIndex(SmallVec<[isize; STACK_DIMS]>);

impl MultiIndex {
    /// The empty multi-index (selects the whole tensor)
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View the indices as a slice.
    pub fn as_slice(&self) -> &[isize] {
        &self.0
    }
}

impl Deref for MultiIndex {
    type Target = [isize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<()> for MultiIndex {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

macro_rules! impl_multi_index_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for MultiIndex {
                fn from(idx: $ty) -> Self {
                    Self(SmallVec::from_slice(&[idx as isize]))
                }
            }

            impl<const N: usize> From<[$ty; N]> for MultiIndex {
                fn from(idx: [$ty; N]) -> Self {
                    Self(idx.iter().map(|&i| i as isize).collect())
                }
            }

            impl<const N: usize> From<&[$ty; N]> for MultiIndex {
                fn from(idx: &[$ty; N]) -> Self {
                    Self(idx.iter().map(|&i| i as isize).collect())
                }
            }

            impl From<&[$ty]> for MultiIndex {
                fn from(idx: &[$ty]) -> Self {
                    Self(idx.iter().map(|&i| i as isize).collect())
                }
            }

            impl From<Vec<$ty>> for MultiIndex {
                fn from(idx: Vec<$ty>) -> Self {
                    Self(idx.into_iter().map(|i| i as isize).collect())
                }
            }

            impl From<($ty,)> for MultiIndex {
                fn from(idx: ($ty,)) -> Self {
                    Self(SmallVec::from_slice(&[idx.0 as isize]))
                }
            }

            impl From<($ty, $ty)> for MultiIndex {
                fn from(idx: ($ty, $ty)) -> Self {
                    Self(SmallVec::from_slice(&[idx.0 as isize, idx.1 as isize]))
                }
            }

            impl From<($ty, $ty, $ty)> for MultiIndex {
                fn from(idx: ($ty, $ty, $ty)) -> Self {
                    Self(SmallVec::from_slice(&[
                        idx.0 as isize,
                        idx.1 as isize,
                        idx.2 as isize,
                    ]))
                }
            }

            impl From<($ty, $ty, $ty, $ty)> for MultiIndex {
                fn from(idx: ($ty, $ty, $ty, $ty)) -> Self {
                    Self(SmallVec::from_slice(&[
                        idx.0 as isize,
                        idx.1 as isize,
                        idx.2 as isize,
                        idx.3 as isize,
                    ]))
                }
            }
        )*
    };
}

impl_multi_index_from!(usize, isize, i32);

/// Flat constructor data for a tensor
///
/// Built from a `Vec`, slice, or array of elements, or from a single element,
/// which is treated as a one-element sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorData<T: Element>(Vec<T>);

impl<T: Element> TensorData<T> {
    /// Number of elements supplied
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no elements were supplied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the underlying buffer
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T: Element> From<T> for TensorData<T> {
    fn from(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T: Element> From<Vec<T>> for TensorData<T> {
    fn from(data: Vec<T>) -> Self {
        Self(data)
    }
}

impl<T: Element> From<&[T]> for TensorData<T> {
    fn from(data: &[T]) -> Self {
        Self(data.to_vec())
    }
}

impl<T: Element, const N: usize> From<[T; N]> for TensorData<T> {
    fn from(data: [T; N]) -> Self {
        Self(data.to_vec())
    }
}

impl<T: Element, const N: usize> From<&[T; N]> for TensorData<T> {
    fn from(data: &[T; N]) -> Self {
        Self(data.to_vec())
    }
}

impl<T: Element> FromIterator<T> for TensorData<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_is_one_element_index() {
        let scalar: MultiIndex = 3usize.into();
        let array: MultiIndex = [3usize].into();
        let tuple: MultiIndex = (3usize,).into();
        assert_eq!(scalar, array);
        assert_eq!(scalar, tuple);
        assert_eq!(scalar.as_slice(), &[3]);
    }

    #[test]
    fn test_sequence_forms() {
        let expected = [2isize, -1];
        assert_eq!(MultiIndex::from((2, -1)).as_slice(), &expected);
        assert_eq!(MultiIndex::from(vec![2isize, -1]).as_slice(), &expected);
        assert_eq!(MultiIndex::from(&[2i32, -1][..]).as_slice(), &expected);
        assert!(MultiIndex::from(()).is_empty());
    }

    #[test]
    fn test_tensor_data_coercion() {
        let single: TensorData<f64> = 5.0.into();
        assert_eq!(single.into_vec(), [5.0]);

        let seq: TensorData<f64> = vec![1.0, 2.0].into();
        assert_eq!(seq.len(), 2);

        let collected: TensorData<i32> = (0..4).collect();
        assert_eq!(collected.into_vec(), [0, 1, 2, 3]);
    }
}
