// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! AVX2+FMA accelerated kernel implementations.
//!
//! The vector bodies process 8 lanes per iteration with the dot product
//! additionally 4x unrolled for instruction-level parallelism, followed by a
//! scalar tail. Each body is gated behind `#[target_feature]`; the backend is
//! only ever selected after [`crate::detect`] confirmed `avx2` and `fma` are
//! both present, so the safe wrappers never execute unsupported instructions.
//!
//! On non-`x86_64` targets this backend compiles to a delegation to the
//! scalar kernels and is never selected at run time.

#[cfg(any(test, not(target_arch = "x86_64")))]
use super::scalar::SCALAR;
use super::KernelBackend;

/// The accelerated backend. Constructed only by the dispatcher.
#[derive(Debug, Default)]
pub(crate) struct SimdKernels;

pub(crate) static SIMD: SimdKernels = SimdKernels;

impl KernelBackend for SimdKernels {
    fn name(&self) -> &'static str {
        "avx2+fma"
    }

    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: selection requires caps::detect() to have reported
            // avx2+fma support for this process.
            unsafe { dot_product_avx2(a, b) }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            SCALAR.dot_product(a, b)
        }
    }

    fn accumulate(&self, a: &mut [f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: see dot_product.
            unsafe { accumulate_avx2(a, b) }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            SCALAR.accumulate(a, b)
        }
    }

    fn saxpy(&self, alpha: f32, x: &[f32], y: &mut [f32]) {
        debug_assert_eq!(x.len(), y.len());
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: see dot_product.
            unsafe { saxpy_avx2(alpha, x, y) }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            SCALAR.saxpy(alpha, x, y)
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[target_feature(enable = "fma")]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::x86_64::*;

    let len = a.len();
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();
    let mut acc2 = _mm256_setzero_ps();
    let mut acc3 = _mm256_setzero_ps();

    let chunks = len / 8;
    let chunks4 = chunks / 4;
    for i in 0..chunks4 {
        let off = i * 32;
        let va = _mm256_loadu_ps(a.as_ptr().add(off));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off));
        acc0 = _mm256_fmadd_ps(va, vb, acc0);

        let va = _mm256_loadu_ps(a.as_ptr().add(off + 8));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off + 8));
        acc1 = _mm256_fmadd_ps(va, vb, acc1);

        let va = _mm256_loadu_ps(a.as_ptr().add(off + 16));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off + 16));
        acc2 = _mm256_fmadd_ps(va, vb, acc2);

        let va = _mm256_loadu_ps(a.as_ptr().add(off + 24));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off + 24));
        acc3 = _mm256_fmadd_ps(va, vb, acc3);
    }

    // Remaining full 8-lane chunks.
    for i in (chunks4 * 4)..chunks {
        let off = i * 8;
        let va = _mm256_loadu_ps(a.as_ptr().add(off));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off));
        acc0 = _mm256_fmadd_ps(va, vb, acc0);
    }

    let acc = _mm256_add_ps(_mm256_add_ps(acc0, acc1), _mm256_add_ps(acc2, acc3));
    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    let mut sum: f32 = lanes.iter().sum();

    // Scalar tail.
    for i in (chunks * 8)..len {
        sum += a[i] * b[i];
    }
    sum
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[target_feature(enable = "fma")]
unsafe fn accumulate_avx2(a: &mut [f32], b: &[f32]) {
    use std::arch::x86_64::*;

    let len = a.len();
    let chunks = len / 8;
    for i in 0..chunks {
        let off = i * 8;
        let va = _mm256_loadu_ps(a.as_ptr().add(off));
        let vb = _mm256_loadu_ps(b.as_ptr().add(off));
        _mm256_storeu_ps(a.as_mut_ptr().add(off), _mm256_add_ps(va, vb));
    }
    for i in (chunks * 8)..len {
        a[i] += b[i];
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[target_feature(enable = "fma")]
unsafe fn saxpy_avx2(alpha: f32, x: &[f32], y: &mut [f32]) {
    use std::arch::x86_64::*;

    let len = x.len();
    let chunks = len / 8;
    let valpha = _mm256_set1_ps(alpha);
    for i in 0..chunks {
        let off = i * 8;
        let vx = _mm256_loadu_ps(x.as_ptr().add(off));
        let vy = _mm256_loadu_ps(y.as_ptr().add(off));
        _mm256_storeu_ps(y.as_mut_ptr().add(off), _mm256_fmadd_ps(valpha, vx, vy));
    }
    for i in (chunks * 8)..len {
        y[i] = alpha * x[i] + y[i];
    }
}
