// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for vector kernel operations.

/// Errors that can occur during kernel dispatch.
///
/// All variants are precondition violations on the caller's side: they are
/// raised before any element is touched, and the destination is never
/// partially mutated.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// Two operands have a different dimensionality count.
    #[error("dims mismatch for {op}: {lhs} vs {rhs}")]
    DimsMismatch {
        op: &'static str,
        lhs: usize,
        rhs: usize,
    },

    /// Two operands have a different declared element count.
    #[error("size mismatch for {op}: {lhs} vs {rhs}")]
    SizeMismatch {
        op: &'static str,
        lhs: usize,
        rhs: usize,
    },

    /// The operation requires 1-D operands but received a higher rank.
    #[error("{op} requires 1-D operands, got dims = {dims}")]
    UnsupportedRank { op: &'static str, dims: usize },
}
