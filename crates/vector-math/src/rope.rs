// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rotary positional-embedding (RoPE) frequency tables.
//!
//! The table is an outer product of position indices and base frequencies,
//! mapped through polar coordinates at unit magnitude: one (cos, sin) phase
//! pair per position × half-dimension. Produced once at model setup and
//! read-only thereafter.

/// All-pairs product of two sequences, flattened row-major:
/// `result[i * ys.len() + j] = xs[i] * ys[j]`.
pub fn outer_product(xs: &[f32], ys: &[f32]) -> Vec<f32> {
    let mut result = Vec::with_capacity(xs.len() * ys.len());
    for &x in xs {
        for &y in ys {
            result.push(x * y);
        }
    }
    result
}

/// Converts polar coordinates to a rectangular (real, imaginary) pair:
/// `(abs * cos(angle), abs * sin(angle))`.
pub fn polar(abs: f32, angle: f32) -> (f32, f32) {
    (abs * angle.cos(), abs * angle.sin())
}

/// A precomputed table of RoPE phase pairs, `end` positions ×
/// `dim / 2` half-dimension indices, row-major.
#[derive(Debug, Clone)]
pub struct RotaryTable {
    half_dim: usize,
    entries: Vec<(f32, f32)>,
}

impl RotaryTable {
    /// Number of (cos, sin) pairs per position.
    pub fn half_dim(&self) -> usize {
        self.half_dim
    }

    /// Number of positions in the table.
    pub fn len(&self) -> usize {
        if self.half_dim == 0 {
            0
        } else {
            self.entries.len() / self.half_dim
        }
    }

    /// Whether the table holds no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The phase pairs for one position.
    pub fn row(&self, position: usize) -> &[(f32, f32)] {
        let start = position * self.half_dim;
        &self.entries[start..start + self.half_dim]
    }

    /// The flat row-major entries, position-major.
    pub fn entries(&self) -> &[(f32, f32)] {
        &self.entries
    }
}

/// Precomputes the RoPE phase table for a head dimension `dim`, sequence
/// length `end`, and frequency base `theta`.
///
/// Base frequencies are `theta^(-2i / dim)` for `i` in `[0, dim / 2)`; the
/// angle for position `p` and index `i` is `p * freq[i]`, taken through
/// [`polar`] at unit magnitude, so each entry is exactly
/// `(cos(angle), sin(angle))`.
pub fn precompute_freqs_cis(dim: usize, end: usize, theta: f64) -> RotaryTable {
    let half_dim = dim / 2;

    let mut freqs = Vec::with_capacity(half_dim);
    let mut step = 0.0f64;
    for _ in 0..half_dim {
        freqs.push((1.0 / theta.powf(step / dim as f64)) as f32);
        step += 2.0;
    }

    let positions: Vec<f32> = (0..end).map(|p| p as f32).collect();
    let angles = outer_product(&positions, &freqs);

    let entries = angles.iter().map(|&angle| polar(1.0, angle)).collect();
    RotaryTable { half_dim, entries }
}
