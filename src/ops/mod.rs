//! Tensor operations
//!
//! Element-wise arithmetic with NumPy-style broadcasting. Operations read
//! their inputs through any strided view and always produce a fresh,
//! contiguous result that does not alias the inputs.
//!
//! ```text
//! Tensor<T>
//!   ├── try_add, try_sub, try_mul, try_div   (broadcasting, fallible)
//!   ├── try_maximum, try_minimum
//!   ├── add_scalar, mul_scalar
//!   └── &a + &b, &a - &b, &a * &b, &a / &b   (std::ops, panic on error)
//! ```

mod arithmetic;

pub use arithmetic::BinaryOp;
