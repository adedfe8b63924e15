// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: a miniature attention-score pipeline.
//!
//! These tests compose the kernel layer the way a transformer layer would:
//! rotary phase tables, per-position dot products fanned out over `pfor`,
//! a softmax over the resulting scores, and a weighted accumulation of
//! value rows — proving that dispatch, reductions, parallelism, and the
//! frequency tables compose correctly on both backends.

use std::sync::Mutex;

use vector_math::{pfor, precompute_freqs_cis, softmax, Kernels, Tensor, VecTensor};

// ── Helpers ────────────────────────────────────────────────────

const DIM: usize = 16;
const SEQ: usize = 8;

/// Deterministic pseudo-embedding for one position.
fn embedding(position: usize) -> Vec<f32> {
    (0..DIM)
        .map(|i| ((position * 31 + i * 7) % 13) as f32 * 0.1 - 0.6)
        .collect()
}

/// Applies rotary phase rotation to consecutive element pairs.
fn rotate(row: &mut [f32], phases: &[(f32, f32)]) {
    for (i, &(cos, sin)) in phases.iter().enumerate() {
        let x0 = row[2 * i];
        let x1 = row[2 * i + 1];
        row[2 * i] = x0 * cos - x1 * sin;
        row[2 * i + 1] = x0 * sin + x1 * cos;
    }
}

/// Computes attention scores of the last position against all positions.
fn attention_scores(kernels: &Kernels) -> Vec<f32> {
    let table = precompute_freqs_cis(DIM, SEQ, 10000.0);

    let keys: Vec<VecTensor> = (0..SEQ)
        .map(|p| {
            let mut row = embedding(p);
            rotate(&mut row, table.row(p));
            VecTensor::from_vec(row)
        })
        .collect();
    let query = keys.last().unwrap().clone();

    let scores = Mutex::new(vec![0.0f32; SEQ]);
    pfor(0, SEQ, |p| {
        let score = kernels
            .dot_product(&query, &keys[p], 0, 0, DIM)
            .expect("query and key dims agree");
        scores.lock().unwrap()[p] = score;
    });

    let mut scores = VecTensor::from_vec(scores.into_inner().unwrap());
    softmax(&mut scores);
    scores.into_vec()
}

// ── Tests ──────────────────────────────────────────────────────

#[test]
fn test_attention_scores_form_distribution() {
    let scores = attention_scores(Kernels::global());
    assert_eq!(scores.len(), SEQ);
    let sum: f32 = scores.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    assert!(scores.iter().all(|&s| s.is_finite() && s > 0.0 && s < 1.0));
}

#[test]
fn test_backends_agree_end_to_end() {
    let detected = attention_scores(Kernels::global());
    let scalar = attention_scores(&Kernels::scalar());
    for (a, b) in detected.iter().zip(scalar.iter()) {
        assert!((a - b).abs() < 1e-5, "{a} vs {b}");
    }
}

#[test]
fn test_weighted_value_accumulation() {
    let kernels = Kernels::global();
    let scores = attention_scores(kernels);

    // out = Σ scores[p] * value[p], built with saxpy then folded once more
    // with accumulate.
    let mut out = VecTensor::zeros(DIM);
    for (p, &weight) in scores.iter().enumerate() {
        let value = VecTensor::from_vec(embedding(p));
        kernels.saxpy(weight, &value, &mut out, 0, 0, DIM).unwrap();
    }

    let mut doubled = out.clone();
    kernels.accumulate(&mut doubled, &out).unwrap();
    for (d, o) in doubled.float_array().iter().zip(out.float_array()) {
        assert!((d - 2.0 * o).abs() < 1e-6);
    }
}
