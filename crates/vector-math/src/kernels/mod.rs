// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel dispatch layer.
//!
//! [`Kernels`] routes each primitive to one of two interchangeable
//! [`KernelBackend`] implementations — accelerated SIMD or portable scalar —
//! chosen once at construction from the cached capability flag. Entry points
//! validate operand shapes, resolve window offsets against the raw backing
//! arrays, and clamp every loop bound to the shorter of the two operands'
//! remaining lengths before handing equal-length slices to the backend.

mod scalar;
mod simd;

pub use scalar::ScalarKernels;

use std::sync::OnceLock;

use crate::caps;
use crate::error::KernelError;
use crate::tensor::Tensor;

/// A kernel implementation the dispatcher can route to.
///
/// Both slices handed to an implementation are pre-windowed to equal length;
/// backends never see offsets or limits. The accelerated backend supplied by
/// the platform must agree with [`ScalarKernels`] within floating-point
/// tolerance on every primitive.
pub trait KernelBackend: Send + Sync {
    /// Short diagnostic name of this backend.
    fn name(&self) -> &'static str;

    /// Σ `a[i] * b[i]` over the full (equal) length of both slices.
    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32;

    /// In-place `a[i] += b[i]`.
    fn accumulate(&self, a: &mut [f32], b: &[f32]);

    /// In-place `y[i] = alpha * x[i] + y[i]`.
    fn saxpy(&self, alpha: f32, x: &[f32], y: &mut [f32]);
}

/// The kernel dispatcher.
///
/// Holds the backend selected at construction; all per-call branching is a
/// single virtual dispatch. Use [`Kernels::global`] for the process-wide
/// auto-detected instance, or [`Kernels::scalar`] to force the portable path
/// (useful as a test double and for bit-exact reproducibility).
pub struct Kernels {
    backend: &'static dyn KernelBackend,
}

static GLOBAL: OnceLock<Kernels> = OnceLock::new();

impl Kernels {
    /// Selects the accelerated backend when the capability probe reports
    /// support, the scalar backend otherwise.
    pub fn detect() -> Self {
        if caps::detect().simd {
            Self {
                backend: &simd::SIMD,
            }
        } else {
            Self::scalar()
        }
    }

    /// Forces the portable scalar backend regardless of hardware support.
    pub fn scalar() -> Self {
        Self {
            backend: &scalar::SCALAR,
        }
    }

    /// Constructs a dispatcher around an externally supplied backend.
    pub fn with_backend(backend: &'static dyn KernelBackend) -> Self {
        Self { backend }
    }

    /// Returns the process-wide auto-detected dispatcher.
    pub fn global() -> &'static Kernels {
        GLOBAL.get_or_init(Kernels::detect)
    }

    /// Returns the name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Dot product of two windows: Σ `a[a_offset + i] * b[b_offset + i]`
    /// for `i` in `[0, limit)`.
    ///
    /// `limit` is additionally clamped to the remaining length of both
    /// backing arrays; `limit == 0` returns `0.0`.
    ///
    /// # Errors
    /// Returns [`KernelError::DimsMismatch`] if the operands disagree on
    /// dimensionality.
    pub fn dot_product<A, B>(
        &self,
        a: &A,
        b: &B,
        a_offset: usize,
        b_offset: usize,
        limit: usize,
    ) -> Result<f32, KernelError>
    where
        A: Tensor + ?Sized,
        B: Tensor + ?Sized,
    {
        check_dims("dot_product", a, b)?;

        let a_arr = a.float_array();
        let b_arr = b.float_array();
        let ao = a.array_offset() + a_offset;
        let bo = b.array_offset() + b_offset;
        let n = limit
            .min(a_arr.len().saturating_sub(ao))
            .min(b_arr.len().saturating_sub(bo));
        if n == 0 {
            return Ok(0.0);
        }

        Ok(self.backend.dot_product(&a_arr[ao..ao + n], &b_arr[bo..bo + n]))
    }

    /// Dot product over `[0, limit)` of both windows.
    pub fn dot_product_from_start<A, B>(&self, a: &A, b: &B, limit: usize) -> Result<f32, KernelError>
    where
        A: Tensor + ?Sized,
        B: Tensor + ?Sized,
    {
        self.dot_product(a, b, 0, 0, limit)
    }

    /// In-place `a[i] += b[i]` over the common range of both windows.
    ///
    /// After mutating through the borrowed raw view, the destination's
    /// write-back hook is invoked with its array offset so copy-on-write
    /// backings can publish the change.
    ///
    /// # Errors
    /// Returns [`KernelError::SizeMismatch`] if the declared sizes differ and
    /// [`KernelError::UnsupportedRank`] unless both operands are 1-D.
    pub fn accumulate<A, B>(&self, a: &mut A, b: &B) -> Result<(), KernelError>
    where
        A: Tensor + ?Sized,
        B: Tensor + ?Sized,
    {
        if a.size() != b.size() {
            return Err(KernelError::SizeMismatch {
                op: "accumulate",
                lhs: a.size(),
                rhs: b.size(),
            });
        }
        check_dims("accumulate", a, b)?;
        if a.dims() != 1 {
            return Err(KernelError::UnsupportedRank {
                op: "accumulate",
                dims: a.dims(),
            });
        }

        let ao = a.array_offset();
        let bo = b.array_offset();
        {
            let b_arr = b.float_array();
            let a_arr = a.float_array_mut();
            let n = (a_arr.len().saturating_sub(ao)).min(b_arr.len().saturating_sub(bo));
            if n > 0 {
                self.backend
                    .accumulate(&mut a_arr[ao..ao + n], &b_arr[bo..bo + n]);
            }
        }
        a.commit(ao);
        Ok(())
    }

    /// In-place `y[y_offset + i] = alpha * x[x_offset + i] + y[y_offset + i]`
    /// for `i` in `[0, limit)`. Mutates only `y`.
    ///
    /// # Errors
    /// Returns [`KernelError::DimsMismatch`] if the operands disagree on
    /// dimensionality.
    pub fn saxpy<X, Y>(
        &self,
        alpha: f32,
        x: &X,
        y: &mut Y,
        x_offset: usize,
        y_offset: usize,
        limit: usize,
    ) -> Result<(), KernelError>
    where
        X: Tensor + ?Sized,
        Y: Tensor + ?Sized,
    {
        check_dims("saxpy", x, y)?;

        let xo = x.array_offset() + x_offset;
        let yo = y.array_offset() + y_offset;
        let x_arr = x.float_array();
        let y_arr = y.float_array_mut();
        let n = limit
            .min(x_arr.len().saturating_sub(xo))
            .min(y_arr.len().saturating_sub(yo));
        if n == 0 {
            return Ok(());
        }

        self.backend
            .saxpy(alpha, &x_arr[xo..xo + n], &mut y_arr[yo..yo + n]);
        Ok(())
    }

    /// In-place `y[y_offset + i] = x[x_offset + i] + beta * y[y_offset + i]`
    /// for `i` in `[0, limit)`. Mutates only `y`.
    ///
    /// This variant is scalar-only: no accelerated path exists for it, so it
    /// runs through the element accessors on every backend.
    ///
    /// # Errors
    /// Returns [`KernelError::DimsMismatch`] if the operands disagree on
    /// dimensionality.
    pub fn sxpby<X, Y>(
        &self,
        beta: f32,
        x: &X,
        y: &mut Y,
        x_offset: usize,
        y_offset: usize,
        limit: usize,
    ) -> Result<(), KernelError>
    where
        X: Tensor + ?Sized,
        Y: Tensor + ?Sized,
    {
        check_dims("sxpby", x, y)?;

        let n = limit
            .min(x.size().saturating_sub(x_offset))
            .min(y.size().saturating_sub(y_offset));

        for i in 0..n {
            let v = x.get(x_offset + i) + beta * y.get(y_offset + i);
            y.set(v, y_offset + i);
        }
        Ok(())
    }
}

fn check_dims<A, B>(op: &'static str, a: &A, b: &B) -> Result<(), KernelError>
where
    A: Tensor + ?Sized,
    B: Tensor + ?Sized,
{
    if a.dims() != b.dims() {
        return Err(KernelError::DimsMismatch {
            op,
            lhs: a.dims(),
            rhs: b.dims(),
        });
    }
    Ok(())
}
