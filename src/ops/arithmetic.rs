//! Broadcasting element-wise arithmetic

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::tensor::{Layout, Storage, StridedIter, Tensor, broadcast_shapes};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::ops::{Add, Div, Mul, Sub};
use tracing::instrument;

/// Parallelization threshold: skip Rayon for small tensors (overhead > benefit)
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 4096;

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Maximum: max(a, b)
    Max,
    /// Minimum: min(a, b)
    Min,
}

impl BinaryOp {
    /// Operation name, used in logs and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Max => "maximum",
            Self::Min => "minimum",
        }
    }

    /// Apply the operation to a pair of elements
    ///
    /// Integer results wrap on overflow.
    ///
    /// # Panics
    ///
    /// Integer division by zero panics. [`Tensor::binary`] rejects such
    /// operands before applying the operation.
    #[inline]
    pub fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::Div => a.wrapping_div(b),
            Self::Max => {
                if b > a {
                    b
                } else {
                    a
                }
            }
            Self::Min => {
                if b < a {
                    b
                } else {
                    a
                }
            }
        }
    }
}

impl<T: Element> Tensor<T> {
    /// Apply `op` element-wise, broadcasting both operands to a common shape
    ///
    /// Returns a new contiguous tensor. Integer addition, subtraction and
    /// multiplication wrap on overflow; integer division by zero or
    /// `MIN / -1` is reported as an error.
    #[instrument(level = "debug", skip_all, fields(op = op.name(), lhs = ?self.shape(), rhs = ?other.shape()))]
    pub fn binary(&self, other: &Self, op: BinaryOp) -> Result<Self> {
        let out_shape = broadcast_shapes(self.shape(), other.shape())
            .ok_or_else(|| Error::broadcast(self.shape(), other.shape()))?;
        let lhs = self.broadcast_to(&out_shape)?;
        let rhs = other.broadcast_to(&out_shape)?;

        let lhs_guard = lhs.storage().read();
        let rhs_guard;
        let rhs_data: &[T] = if lhs.shares_storage(&rhs) {
            &lhs_guard
        } else {
            rhs_guard = rhs.storage().read();
            &rhs_guard
        };

        if op == BinaryOp::Div && T::DTYPE.is_int() {
            let undefined = StridedIter::new(lhs.layout())
                .zip(StridedIter::new(rhs.layout()))
                .map(|(i, j)| (lhs_guard[i], rhs_data[j]))
                .find(|&(a, b)| a.checked_div(b).is_none());
            if let Some((_, divisor)) = undefined {
                let reason = if divisor == T::zero() {
                    "integer division by zero"
                } else {
                    "integer division overflow"
                };
                return Err(Error::invalid_argument("rhs", reason));
            }
        }

        let data = if lhs.is_contiguous() && rhs.is_contiguous() {
            let a = &lhs_guard[lhs.offset()..lhs.offset() + lhs.size()];
            let b = &rhs_data[rhs.offset()..rhs.offset() + rhs.size()];
            contiguous_kernel(op, a, b)
        } else {
            StridedIter::new(lhs.layout())
                .zip(StridedIter::new(rhs.layout()))
                .map(|(i, j)| op.apply(lhs_guard[i], rhs_data[j]))
                .collect()
        };

        Ok(Self::from_parts(
            Storage::from_vec(data),
            Layout::contiguous(&out_shape),
        ))
    }

    /// Element-wise addition with broadcasting
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Add)
    }

    /// Element-wise subtraction with broadcasting
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Sub)
    }

    /// Element-wise multiplication with broadcasting
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Mul)
    }

    /// Element-wise division with broadcasting
    pub fn try_div(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Div)
    }

    /// Element-wise maximum with broadcasting
    pub fn try_maximum(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Max)
    }

    /// Element-wise minimum with broadcasting
    pub fn try_minimum(&self, other: &Self) -> Result<Self> {
        self.binary(other, BinaryOp::Min)
    }

    /// Add a scalar to every element (integers wrap)
    pub fn add_scalar(&self, value: T) -> Self {
        self.map(|x| x.wrapping_add(value))
    }

    /// Multiply every element by a scalar (integers wrap)
    pub fn mul_scalar(&self, value: T) -> Self {
        self.map(|x| x.wrapping_mul(value))
    }

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        let data = self.flatten().into_iter().map(f).collect();
        Self::from_parts(Storage::from_vec(data), Layout::contiguous(self.shape()))
    }
}

fn contiguous_kernel<T: Element>(op: BinaryOp, a: &[T], b: &[T]) -> Vec<T> {
    #[cfg(feature = "rayon")]
    if a.len() >= PARALLEL_THRESHOLD {
        return a
            .par_iter()
            .zip(b.par_iter())
            .map(|(&x, &y)| op.apply(x, y))
            .collect();
    }

    a.iter().zip(b).map(|(&x, &y)| op.apply(x, y)).collect()
}

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $try_method:ident) => {
        impl<T: Element> $trait<&Tensor<T>> for &Tensor<T> {
            type Output = Tensor<T>;

            /// # Panics
            ///
            /// Panics if the shapes cannot be broadcast together. Use the
            /// `try_*` method for a fallible alternative.
            fn $method(self, rhs: &Tensor<T>) -> Tensor<T> {
                match self.$try_method(rhs) {
                    Ok(out) => out,
                    Err(e) => panic!("Tensor::{} failed: {e}", stringify!($method)),
                }
            }
        }
    };
}

impl_binary_operator!(Add, add, try_add);
impl_binary_operator!(Sub, sub, try_sub);
impl_binary_operator!(Mul, mul, try_mul);
impl_binary_operator!(Div, div, try_div);
