// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One-time runtime detection of SIMD support.
//!
//! The probe runs exactly once per process and the result is cached in a
//! process-wide immutable flag; every dispatch decision reads the cached
//! value. Detection is an explicit feature query, never attempt-and-catch:
//! an unsupported platform simply reports `simd = false` and the scalar
//! kernels are used.

use std::sync::OnceLock;

/// Detected capabilities of the current hardware.
#[derive(Clone, Copy, Debug)]
pub struct Caps {
    /// Whether the accelerated kernel path is usable on this CPU.
    pub simd: bool,
    /// Available hardware parallelism (worker count for [`crate::pfor`]).
    pub threads: usize,
}

static CAPS: OnceLock<Caps> = OnceLock::new();

/// Detect hardware capabilities (cached after the first call).
///
/// Emits a single diagnostic log line reporting the outcome. The probe is
/// never retried: a `false` result is final for the life of the process.
pub fn detect() -> Caps {
    *CAPS.get_or_init(|| {
        let simd = probe_simd();
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        if simd {
            tracing::info!("SIMD vector kernels available ({})", isa_name());
        } else {
            tracing::info!("SIMD not available; using scalar vector kernels");
        }

        Caps { simd, threads }
    })
}

/// Query the instruction set the accelerated backend is compiled for.
///
/// AVX2 does not imply FMA; both are required before the accelerated path is
/// considered usable, so a partially capable CPU falls back to scalar rather
/// than faulting mid-kernel.
fn probe_simd() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

fn isa_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        "avx2+fma"
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        "none"
    }
}
