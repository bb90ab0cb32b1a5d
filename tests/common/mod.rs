//! Common test utilities
#![allow(dead_code)]

use mytensor::tensor::Tensor;

/// A `[4, 6]` f64 tensor holding `0.0..24.0` row-major
pub fn grid_4x6() -> Tensor<f64> {
    let values: Vec<f64> = (0..24).map(|i| i as f64).collect();
    Tensor::from_vec(&[4, 6], values).expect("grid construction")
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
