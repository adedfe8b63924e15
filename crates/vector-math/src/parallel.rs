// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fan-out of independent per-index work across available hardware
//! parallelism.
//!
//! Built on `std::thread::scope`: no pool kept alive between calls, no heap
//! allocation for the workers. Intended for embarrassingly parallel work with
//! disjoint writes — no internal synchronization is provided, so callers must
//! ensure indices do not race.

use crate::caps;

/// Invokes `action(i)` exactly once for every `i` in `[start, end)`.
///
/// The range is partitioned into per-worker chunks sized to the detected
/// hardware parallelism; there is no ordering guarantee between invocations.
/// Blocks until all invocations complete. `start == end` performs zero
/// invocations, and ranges smaller than one chunk run inline on the caller
/// thread. A panic in any invocation propagates to the caller once the scope
/// joins.
pub fn pfor<F>(start: usize, end: usize, action: F)
where
    F: Fn(usize) + Sync,
{
    if start >= end {
        return;
    }

    let workers = caps::detect().threads;
    let total = end - start;
    let chunk_size = total.div_ceil(workers);

    if total <= chunk_size || workers <= 1 {
        for i in start..end {
            action(i);
        }
        return;
    }

    let action = &action;
    std::thread::scope(|s| {
        for chunk_start in (start..end).step_by(chunk_size) {
            let chunk_end = (chunk_start + chunk_size).min(end);
            s.spawn(move || {
                for i in chunk_start..chunk_end {
                    action(i);
                }
            });
        }
    });
}

/// Fallible variant of [`pfor`] with first-observed-error propagation.
///
/// Each worker stops its own chunk at the first error it encounters; other
/// chunks still run to completion (there is no cancellation or timeout). The
/// caller receives the first error in chunk order. On success every index in
/// `[start, end)` has been visited exactly once.
pub fn try_pfor<F, E>(start: usize, end: usize, action: F) -> Result<(), E>
where
    F: Fn(usize) -> Result<(), E> + Sync,
    E: Send,
{
    if start >= end {
        return Ok(());
    }

    let workers = caps::detect().threads;
    let total = end - start;
    let chunk_size = total.div_ceil(workers);

    if total <= chunk_size || workers <= 1 {
        for i in start..end {
            action(i)?;
        }
        return Ok(());
    }

    let action = &action;
    std::thread::scope(|s| {
        let handles: Vec<_> = (start..end)
            .step_by(chunk_size)
            .map(|chunk_start| {
                let chunk_end = (chunk_start + chunk_size).min(end);
                s.spawn(move || {
                    for i in chunk_start..chunk_end {
                        action(i)?;
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok(())
    })
}
