// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # vector-math
//!
//! Float vector kernels underlying transformer-model inference: dot products,
//! fused scale-add, in-place accumulation, normalization, softmax, and rotary
//! positional-encoding tables, all operating on flat `f32` buffers that are
//! logical windows into larger tensor storage.
//!
//! This crate provides:
//! - [`Kernels`] — the dispatch layer routing each primitive to an accelerated
//!   SIMD backend or a portable scalar fallback, selected once at construction.
//! - [`Tensor`] — the consumed tensor-window capability set (raw backing array,
//!   offset, size, dimensionality, write-back hook).
//! - Reductions: [`softmax`], [`l1_normalize`], [`l2_normalize`],
//!   [`cosine_similarity`] — dispatch-independent buffer math.
//! - [`pfor`] / [`try_pfor`] — fan-out of independent per-index work across
//!   available hardware parallelism.
//! - [`precompute_freqs_cis`] — rotary positional-embedding (cos, sin) tables.
//!
//! # Design Goals
//! - No owned storage in the kernel layer: callers pass windows, the kernels
//!   never allocate on the hot path.
//! - Capability detection runs exactly once per process and is safe for
//!   unsynchronized concurrent reads thereafter.
//! - Clean error types via `thiserror`; shape mismatches fail immediately and
//!   are never silently truncated.

mod caps;
mod error;
mod kernels;
mod parallel;
mod reductions;
mod rope;
mod tensor;

pub use caps::{detect, Caps};
pub use error::KernelError;
pub use kernels::{KernelBackend, Kernels, ScalarKernels};
pub use parallel::{pfor, try_pfor};
pub use reductions::{
    cosine_similarity, l1_normalize, l1_normalize_slice, l2_normalize, l2_normalize_slice, softmax,
};
pub use rope::{outer_product, polar, precompute_freqs_cis, RotaryTable};
pub use tensor::{Tensor, VecTensor};
