//! Element trait: the scalar types a tensor can hold

use super::DType;
use bytemuck::Pod;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of a tensor
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - tensors share buffers across threads
/// - `Pod` - raw byte views of the buffer (bytemuck)
/// - `Add + Sub + Mul + Div` - element-wise arithmetic
/// - `PartialOrd + Debug` - comparisons and formatting
///
/// `to_f64` / `from_f64` let callers feed integer or float values into any
/// tensor regardless of its element type.
///
/// The `wrapping_*` hooks are what element-wise kernels call: integers wrap
/// on overflow, floats use plain IEEE arithmetic. `checked_div` reports the
/// integer divisions that have no result (`x / 0`, `MIN / -1`).
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Debug
    + PartialOrd
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The runtime tag for this Rust type
    const DTYPE: DType;

    /// Convert to f64
    fn to_f64(self) -> f64;

    /// Convert from f64 (saturating `as` semantics for integers)
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Addition, wrapping on integer overflow
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Subtraction, wrapping on integer overflow
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Multiplication, wrapping on integer overflow
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Division, wrapping `MIN / -1` to `MIN`
    ///
    /// # Panics
    ///
    /// Integer division by zero panics; check with [`Element::checked_div`]
    /// first.
    fn wrapping_div(self, rhs: Self) -> Self;

    /// Division, `None` when an integer division has no result
    fn checked_div(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_primitive_element {
    (@ops float, $ty:ty) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            self + rhs
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            self - rhs
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            self * rhs
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            self / rhs
        }

        #[inline]
        fn checked_div(self, rhs: Self) -> Option<Self> {
            Some(self / rhs)
        }
    };
    (@ops int, $ty:ty) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            <$ty>::wrapping_add(self, rhs)
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            <$ty>::wrapping_sub(self, rhs)
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            <$ty>::wrapping_mul(self, rhs)
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            <$ty>::wrapping_div(self, rhs)
        }

        #[inline]
        fn checked_div(self, rhs: Self) -> Option<Self> {
            <$ty>::checked_div(self, rhs)
        }
    };
    ($($ty:ty => $dtype:ident, $kind:ident, $zero:expr, $one:expr;)*) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $ty
                }

                #[inline]
                fn zero() -> Self {
                    $zero
                }

                #[inline]
                fn one() -> Self {
                    $one
                }

                impl_primitive_element!(@ops $kind, $ty);
            }
        )*
    };
}

impl_primitive_element! {
    f64 => F64, float, 0.0, 1.0;
    f32 => F32, float, 0.0, 1.0;
    i64 => I64, int, 0, 1;
    i32 => I32, int, 0, 1;
    i16 => I16, int, 0, 1;
    i8 => I8, int, 0, 1;
    u64 => U64, int, 0, 1;
    u32 => U32, int, 0, 1;
    u8 => U8, int, 0, 1;
}

// ============================================================================
// Half-precision floating point types (requires "f16" feature)
// ============================================================================

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::f16::ONE
    }

    impl_primitive_element!(@ops float, half::f16);
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::bf16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::bf16::ONE
    }

    impl_primitive_element!(@ops float, half::bf16);
}
