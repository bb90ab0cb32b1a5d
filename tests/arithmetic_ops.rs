//! Integration tests for element-wise arithmetic
//!
//! Tests verify correctness across:
//! - Broadcasting between different ranks
//! - Strided (non-contiguous) operands
//! - Multiple dtypes
//! - Error cases

mod common;

use common::{assert_allclose_f64, grid_4x6};
use mytensor::error::Error;
use mytensor::ops::BinaryOp;
use mytensor::tensor::Tensor;

#[test]
fn test_add_matches_elementwise_sum() {
    let a = grid_4x6();
    let b = grid_4x6();
    let c = &a + &b;
    let expected: Vec<f64> = (0..24).map(|i| 2.0 * i as f64).collect();
    assert_eq!(c.flatten(), expected);
    assert!(c.is_contiguous());
}

#[test]
fn test_add_result_is_independent() {
    let a = grid_4x6();
    let c = a.try_add(&Tensor::zeros(&[4, 6])).unwrap();
    c.set((0, 0), -5.0).unwrap();
    assert_eq!(a.at((0, 0)).unwrap(), 0.0);
}

#[test]
fn test_broadcast_row_and_column() {
    let col = Tensor::<f64>::from_data(&[4, 1], [0.0, 10.0, 20.0, 30.0]).unwrap();
    let row = Tensor::<f64>::from_data(&[6], [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let outer = col.try_add(&row).unwrap();
    assert_eq!(outer.shape(), &[4, 6]);
    assert_eq!(outer.at((3, 5)).unwrap(), 35.0);
    assert_eq!(outer.get(1).unwrap().flatten(), [10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
}

#[test]
fn test_ops_on_views() {
    let t = grid_4x6();
    let left = t.narrow(1, 0, 3).unwrap();
    let right = t.narrow(1, 3, 3).unwrap();
    let diff = right.try_sub(&left).unwrap();
    assert_eq!(diff.flatten(), vec![3.0; 12]);

    let flipped = t.flip(-1).unwrap();
    let sum = t.try_add(&flipped).unwrap();
    for r in 0..4 {
        let expected = (r * 6 + r * 6 + 5) as f64;
        assert_eq!(sum.get(r).unwrap().flatten(), [expected; 6]);
    }
}

#[test]
fn test_division_f32_and_f64() {
    let a = Tensor::<f32>::from_data(&[3], [1.0, 2.0, 3.0]).unwrap();
    let b = Tensor::<f32>::full(&[3], 3.0);
    let q: Vec<f64> = (&a / &b).flatten().into_iter().map(f64::from).collect();
    assert_allclose_f64(&q, &[1.0 / 3.0, 2.0 / 3.0, 1.0], 1e-6, 1e-7, "f32 div");

    let a = grid_4x6().narrow(0, 1, 1).unwrap();
    let q = a.mul_scalar(0.5).try_div(&Tensor::full(&[1], 2.0)).unwrap();
    assert_allclose_f64(
        &q.flatten(),
        &[1.5, 1.75, 2.0, 2.25, 2.5, 2.75],
        1e-12,
        0.0,
        "f64 div",
    );
}

#[test]
fn test_integer_ops() {
    let a = Tensor::<i64>::arange(&[2, 2]);
    let b = Tensor::<i64>::full(&[2], 3);
    assert_eq!(a.binary(&b, BinaryOp::Mul).unwrap().flatten(), [0, 3, 6, 9]);
    assert_eq!(a.try_maximum(&b).unwrap().flatten(), [3, 3, 3, 3]);
    assert_eq!(a.try_minimum(&b).unwrap().flatten(), [0, 1, 2, 3]);
    assert!(b.try_div(&a).is_err());
}

#[test]
fn test_integer_division_overflow_is_an_error() {
    let min = Tensor::<i32>::from_data(&[1], i32::MIN).unwrap();
    let neg_one = Tensor::<i32>::from_data(&[1], -1).unwrap();
    match min.try_div(&neg_one) {
        Err(Error::InvalidArgument { arg, reason }) => {
            assert_eq!(arg, "rhs");
            assert!(reason.contains("overflow"), "{reason}");
        }
        other => panic!("expected overflow error, got {other:?}"),
    }

    // broadcast divisor reaching MIN only in one slot
    let lhs = Tensor::<i8>::from_data(&[3], [6, i8::MIN, 9]).unwrap();
    assert!(lhs.try_div(&Tensor::full(&[1], -1)).is_err());
    assert_eq!(
        lhs.try_div(&Tensor::full(&[1], 3)).unwrap().flatten(),
        [2, i8::MIN / 3, 3]
    );
}

#[test]
fn test_integer_overflow_wraps() {
    let a = Tensor::<i8>::from_data(&[1], 127).unwrap();
    assert_eq!(a.try_add(&a).unwrap().flatten(), [-2]);
    assert_eq!(a.try_mul(&a).unwrap().flatten(), [1]);
    assert_eq!(a.add_scalar(1).flatten(), [i8::MIN]);

    let zero = Tensor::<u8>::zeros(&[2]);
    let one = Tensor::<u8>::ones(&[1]);
    assert_eq!(zero.try_sub(&one).unwrap().flatten(), [u8::MAX, u8::MAX]);
    assert_eq!((&zero - &one).flatten(), [u8::MAX, u8::MAX]);
}

#[test]
fn test_broadcast_shape_overflow() {
    let tall = Tensor::<f64>::zeros(&[1 << 40, 0]).unsqueeze(-1).unwrap();
    let wide = Tensor::<f64>::zeros(&[1, 1 << 40]);
    assert!(matches!(
        tall.try_add(&wide),
        Err(Error::InvalidArgument { arg: "shape", .. })
    ));
}

#[test]
fn test_incompatible_shapes() {
    let a = grid_4x6();
    let b = Tensor::<f64>::zeros(&[4]);
    assert!(matches!(
        a.try_add(&b),
        Err(Error::BroadcastError { .. })
    ));
}

#[test]
fn test_empty_operands() {
    let a = Tensor::<f64>::zeros(&[0, 3]);
    let b = Tensor::<f64>::zeros(&[3]);
    let c = a.try_add(&b).unwrap();
    assert_eq!(c.shape(), &[0, 3]);
    assert_eq!(c.size(), 0);

    let s = Tensor::<f64>::zeros(&[]);
    assert_eq!(s.try_add(&s).unwrap().size(), 0);
}
