// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The tensor-window capability set consumed by the kernel layer.
//!
//! The kernel layer never owns storage. It receives logical windows — a
//! backing array reference, an element offset into it, a declared element
//! count, and a dimensionality count — supplied by an external tensor
//! abstraction implementing [`Tensor`]. A [`VecTensor`] reference
//! implementation is provided for tests and simple callers.

/// A logical float window into larger tensor storage.
///
/// Indices passed to [`get`](Tensor::get) and [`set`](Tensor::set) are
/// *logical*: they are relative to the window and resolved against
/// [`array_offset`](Tensor::array_offset) internally. The raw accessors
/// expose the whole backing array; kernels that mutate through a borrowed
/// raw view must call [`commit`](Tensor::commit) afterwards so that
/// copy-on-write backings can publish the change. Directly-mutable backings
/// keep the default no-op `commit`.
pub trait Tensor {
    /// Reads the element at logical index `i`.
    fn get(&self, i: usize) -> f32;

    /// Writes `value` at logical index `i`.
    fn set(&mut self, value: f32, i: usize);

    /// Returns the raw backing array this window views into.
    fn float_array(&self) -> &[f32];

    /// Returns the raw backing array for bulk in-place mutation.
    ///
    /// Copy-on-write backings materialize a private scratch copy here; the
    /// mutation becomes visible to other holders only after
    /// [`commit`](Tensor::commit).
    fn float_array_mut(&mut self) -> &mut [f32];

    /// Returns the element offset of this window within the backing array.
    fn array_offset(&self) -> usize;

    /// Returns the declared element count of this window.
    fn size(&self) -> usize;

    /// Returns the dimensionality count of the underlying tensor.
    fn dims(&self) -> usize;

    /// Write-back hook invoked after bulk in-place mutation of a borrowed
    /// raw view, with the offset the mutation started at.
    fn commit(&mut self, offset: usize) {
        let _ = offset;
    }
}

/// An owned, 1-D tensor window backed by a `Vec<f32>`.
///
/// The simplest possible [`Tensor`]: the backing is directly mutable, so the
/// write-back hook is a no-op.
#[derive(Debug, Clone)]
pub struct VecTensor {
    data: Vec<f32>,
    offset: usize,
    size: usize,
    dims: usize,
}

impl VecTensor {
    /// Creates a 1-D tensor owning `data`, windowed over the whole buffer.
    pub fn from_vec(data: Vec<f32>) -> Self {
        let size = data.len();
        Self {
            data,
            offset: 0,
            size,
            dims: 1,
        }
    }

    /// Creates a zero-filled 1-D tensor of `len` elements.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    /// Creates a window at `offset` into `data` with a declared `size`.
    ///
    /// `size` follows the window convention used throughout this crate: it
    /// bounds logical indices, and windowed reductions scan `[offset, size)`
    /// of the backing array.
    pub fn window(data: Vec<f32>, offset: usize, size: usize, dims: usize) -> Self {
        debug_assert!(offset <= data.len());
        Self {
            data,
            offset,
            size,
            dims,
        }
    }

    /// Consumes the tensor, returning the backing buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl Tensor for VecTensor {
    fn get(&self, i: usize) -> f32 {
        self.data[self.offset + i]
    }

    fn set(&mut self, value: f32, i: usize) {
        self.data[self.offset + i] = value;
    }

    fn float_array(&self) -> &[f32] {
        &self.data
    }

    fn float_array_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn array_offset(&self) -> usize {
        self.offset
    }

    fn size(&self) -> usize {
        self.size
    }

    fn dims(&self) -> usize {
        self.dims
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::CowTensor;
    use super::*;

    #[test]
    fn test_vec_tensor_roundtrip() {
        let mut t = VecTensor::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(t.size(), 3);
        assert_eq!(t.dims(), 1);
        assert_eq!(t.get(1), 2.0);

        t.set(9.0, 1);
        assert_eq!(t.get(1), 9.0);
        assert_eq!(t.float_array(), &[1.0, 9.0, 3.0]);
    }

    #[test]
    fn test_window_logical_indexing() {
        let t = VecTensor::window(vec![0.0, 1.0, 2.0, 3.0], 2, 4, 1);
        assert_eq!(t.array_offset(), 2);
        // Logical index 0 maps to backing index 2.
        assert_eq!(t.get(0), 2.0);
        assert_eq!(t.get(1), 3.0);
    }

    #[test]
    fn test_cow_commit_publishes() {
        let original = CowTensor::from_vec(vec![1.0, 2.0]);
        let mut copy = original.clone();

        copy.float_array_mut()[0] = 7.0;
        // Mutation is private until committed.
        assert_eq!(original.float_array(), &[1.0, 2.0]);
        assert!(!copy.committed());

        copy.commit(0);
        assert!(copy.committed());
        assert_eq!(copy.float_array(), &[7.0, 2.0]);
        assert_eq!(original.float_array(), &[1.0, 2.0]);
    }
}
