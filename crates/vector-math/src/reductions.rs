// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dispatch-independent reductions: softmax, L1/L2 normalization, and cosine
//! similarity.
//!
//! These operate directly on buffers and windows without consulting the
//! kernel dispatcher. Windowed variants scan `[offset, size)` of the raw
//! backing array; slice variants cover the whole slice.

use crate::tensor::Tensor;

/// In-place numerically stable softmax over a tensor window.
///
/// Two passes over `[offset, size)` find the maximum and replace each element
/// with `exp(x - max)` while accumulating the sum. The final divide pass
/// spans `[0, size)` — the full buffer prefix, not just the window. Callers
/// that window softmax into the middle of a larger buffer must account for
/// the prefix being scaled as well.
pub fn softmax<T: Tensor + ?Sized>(t: &mut T) {
    let offset = t.array_offset();
    let size = t.size();
    let x = t.float_array_mut();
    if size == 0 || offset >= size {
        return;
    }

    // Find the max value (for numerical stability).
    let mut max_val = x[offset];
    for &v in &x[offset + 1..size] {
        if v > max_val {
            max_val = v;
        }
    }

    // Exp and sum.
    let mut sum = 0.0f32;
    for v in &mut x[offset..size] {
        *v = (*v - max_val).exp();
        sum += *v;
    }

    // Normalize. The divide pass walks [0, size), not [offset, size).
    for v in &mut x[..size] {
        *v /= sum;
    }
}

/// In-place L1 normalization of a tensor window: divides each element in
/// `[offset, size)` by the sum of absolute values over that range.
pub fn l1_normalize<T: Tensor + ?Sized>(t: &mut T) {
    let offset = t.array_offset();
    let size = t.size();
    let x = t.float_array_mut();
    if size == 0 || offset >= size {
        return;
    }

    let sum: f32 = x[offset..size].iter().map(|v| v.abs()).sum();
    for v in &mut x[offset..size] {
        *v /= sum;
    }
}

/// In-place L1 normalization of a flat buffer.
pub fn l1_normalize_slice(x: &mut [f32]) {
    let sum: f32 = x.iter().map(|v| v.abs()).sum();
    for v in x.iter_mut() {
        *v /= sum;
    }
}

/// In-place L2 normalization of a tensor window.
///
/// The sum of squares accumulates in `f64` and the square root is taken
/// before dividing back into single precision.
pub fn l2_normalize<T: Tensor + ?Sized>(t: &mut T) {
    let offset = t.array_offset();
    let size = t.size();
    let x = t.float_array_mut();
    if size == 0 || offset >= size {
        return;
    }

    let sum: f64 = x[offset..size].iter().map(|&v| f64::from(v) * f64::from(v)).sum();
    let magnitude = sum.sqrt();
    for v in &mut x[offset..size] {
        *v = (f64::from(*v) / magnitude) as f32;
    }
}

/// In-place L2 normalization of a flat buffer.
pub fn l2_normalize_slice(x: &mut [f32]) {
    let sum: f64 = x.iter().map(|&v| f64::from(v) * f64::from(v)).sum();
    let magnitude = sum.sqrt();
    for v in x.iter_mut() {
        *v = (f64::from(*v) / magnitude) as f32;
    }
}

/// Cosine similarity between two flat buffers.
///
/// A single pass accumulates the dot product and both squared magnitudes
/// simultaneously; the range clamps to the shorter of the two buffers.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut a_mag = 0.0f32;
    let mut b_mag = 0.0f32;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        a_mag += x * x;
        b_mag += y * y;
    }
    (f64::from(dot) / (f64::from(a_mag).sqrt() * f64::from(b_mag).sqrt())) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::VecTensor;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() < tol, "{a} vs {b}");
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let mut t = VecTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        softmax(&mut t);
        let sum: f32 = t.float_array().iter().sum();
        assert_close(sum, 1.0, 1e-5);
    }

    #[test]
    fn test_softmax_uniform() {
        let mut t = VecTensor::from_vec(vec![1.0; 4]);
        softmax(&mut t);
        for &v in t.float_array() {
            assert_close(v, 0.25, 1e-6);
        }
    }

    #[test]
    fn test_softmax_shift_invariant() {
        let input = vec![0.5, -1.0, 2.0, 0.0];
        let mut base = VecTensor::from_vec(input.clone());
        let mut shifted = VecTensor::from_vec(input.iter().map(|v| v + 100.0).collect());
        softmax(&mut base);
        softmax(&mut shifted);
        for (a, b) in base.float_array().iter().zip(shifted.float_array()) {
            assert_close(*a, *b, 1e-5);
        }
    }

    #[test]
    fn test_softmax_numerical_stability() {
        // Values that would overflow exp() without the max subtraction.
        let mut t = VecTensor::from_vec(vec![1000.0, 1001.0, 1002.0]);
        softmax(&mut t);
        assert!(t.float_array().iter().all(|v| v.is_finite()));
        let sum: f32 = t.float_array().iter().sum();
        assert_close(sum, 1.0, 1e-5);
    }

    #[test]
    fn test_softmax_divide_spans_buffer_prefix() {
        // Window [offset=1, size=3): max = 1, exp(0) = 1 twice, sum = 2.
        // The divide pass also scales the prefix element at index 0.
        let mut t = VecTensor::window(vec![10.0, 1.0, 1.0], 1, 3, 1);
        softmax(&mut t);
        let x = t.float_array();
        assert_close(x[0], 5.0, 1e-6);
        assert_close(x[1], 0.5, 1e-6);
        assert_close(x[2], 0.5, 1e-6);
    }

    #[test]
    fn test_l1_normalize_sums_to_one() {
        let mut t = VecTensor::from_vec(vec![1.0, -2.0, 3.0]);
        l1_normalize(&mut t);
        let sum: f32 = t.float_array().iter().map(|v| v.abs()).sum();
        assert_close(sum, 1.0, 1e-6);
    }

    #[test]
    fn test_l1_normalize_slice() {
        let mut x = [2.0, 2.0];
        l1_normalize_slice(&mut x);
        assert_eq!(x, [0.5, 0.5]);
    }

    #[test]
    fn test_l2_normalize_unit_norm() {
        let mut t = VecTensor::from_vec(vec![3.0, 4.0]);
        l2_normalize(&mut t);
        let norm: f32 = t.float_array().iter().map(|v| v * v).sum::<f32>().sqrt();
        assert_close(norm, 1.0, 1e-6);
        assert_close(t.float_array()[0], 0.6, 1e-6);
        assert_close(t.float_array()[1], 0.8, 1e-6);
    }

    #[test]
    fn test_l2_normalize_windowed() {
        // Prefix outside the window is untouched.
        let mut t = VecTensor::window(vec![9.0, 3.0, 4.0], 1, 3, 1);
        l2_normalize(&mut t);
        let x = t.float_array();
        assert_eq!(x[0], 9.0);
        let norm: f32 = (x[1] * x[1] + x[2] * x[2]).sqrt();
        assert_close(norm, 1.0, 1e-6);
    }

    #[test]
    fn test_l2_normalize_slice() {
        let mut x = [1.0, 0.0, 0.0];
        l2_normalize_slice(&mut x);
        assert_eq!(x, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cosine_similarity_self() {
        let a = [0.3, -1.2, 4.5, 0.01];
        assert_close(cosine_similarity(&a, &a), 1.0, 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_close(cosine_similarity(&a, &b), 0.0, 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = [1.0, 2.0];
        let b = [-1.0, -2.0];
        assert_close(cosine_similarity(&a, &b), -1.0, 1e-6);
    }
}
