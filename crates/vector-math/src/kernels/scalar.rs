// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Portable scalar kernel implementations.
//!
//! These loops are the reference semantics for every primitive: the
//! accelerated backend must agree with them within floating-point tolerance.
//! They are also the permanent fallback on hardware without SIMD support and
//! the forced backend behind [`crate::Kernels::scalar`].

use super::KernelBackend;

/// The portable scalar backend.
#[derive(Debug, Default)]
pub struct ScalarKernels;

pub(crate) static SCALAR: ScalarKernels = ScalarKernels;

impl KernelBackend for ScalarKernels {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let mut sum = 0.0;
        for (x, y) in a.iter().zip(b.iter()) {
            sum += x * y;
        }
        sum
    }

    fn accumulate(&self, a: &mut [f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter_mut().zip(b.iter()) {
            *x += y;
        }
    }

    fn saxpy(&self, alpha: f32, x: &[f32], y: &mut [f32]) {
        debug_assert_eq!(x.len(), y.len());
        for (yi, xi) in y.iter_mut().zip(x.iter()) {
            *yi = alpha * xi + *yi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_basic() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(SCALAR.dot_product(&a, &b), 32.0);
    }

    #[test]
    fn test_dot_product_empty() {
        assert_eq!(SCALAR.dot_product(&[], &[]), 0.0);
    }

    #[test]
    fn test_accumulate() {
        let mut a = [1.0, 2.0, 3.0];
        SCALAR.accumulate(&mut a, &[10.0, 20.0, 30.0]);
        assert_eq!(a, [11.0, 22.0, 33.0]);
    }

    #[test]
    fn test_saxpy() {
        let mut y = [1.0, 1.0, 1.0];
        SCALAR.saxpy(2.0, &[1.0, 2.0, 3.0], &mut y);
        assert_eq!(y, [3.0, 5.0, 7.0]);
    }
}
