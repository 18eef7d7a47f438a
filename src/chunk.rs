//! Sparse chunk layout (`MemDist`) describing the live region of a rank's
//! local state buffer.
//!
//! Grounded on `RK_MPI_SA_check_mem` in
//! `original_source/.../RK_MPI_SAsolver_hybrid.c`: chunks are non-overlapping,
//! strictly increasing index ranges, each carrying its own error-weight
//! multiplier. The complement (gaps between chunks) holds halo/boundary
//! data the solver must never touch.

use crate::error::ChunkError;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};

/// One contiguous, non-halo range of the local state buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chunk<F> {
    pub start: usize,
    pub size: usize,
    pub eps_mult: F,
}

impl<F: Scalar> Chunk<F> {
    pub fn new(start: usize, size: usize, eps_mult: F) -> Self {
        Self {
            start,
            size,
            eps_mult,
        }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// An ordered list of [`Chunk`]s describing the sparse, non-halo interior of
/// a rank's local state buffer (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemDist<F> {
    chunks: Vec<Chunk<F>>,
}

impl<F: Scalar> MemDist<F> {
    /// Build a layout from an explicit chunk list. Does not validate —
    /// call [`MemDist::validate`] before handing this to the solver.
    pub fn new(chunks: Vec<Chunk<F>>) -> Self {
        Self { chunks }
    }

    /// A single chunk spanning `[0, size)` with unit error weight — the
    /// common case of a densely packed, non-sparse block.
    pub fn dense(size: usize) -> Self {
        Self::new(vec![Chunk::new(0, size, F::one())])
    }

    pub fn chunks(&self) -> &[Chunk<F>] {
        &self.chunks
    }

    /// Total number of live (non-halo) state indices across all chunks.
    pub fn live_len(&self) -> usize {
        self.chunks.iter().map(|c| c.size).sum()
    }

    /// Check the invariants of `spec.md` §3/§4.1. Side-effect free.
    ///
    /// `max_block_size` is the capacity supplied to the solver at `init`;
    /// callers with no solver handle yet (e.g. unit tests) can pass any
    /// capacity they want to check against.
    pub fn validate(&self, max_block_size: usize) -> Result<(), ChunkError> {
        if self.chunks.is_empty() {
            return Err(ChunkError::NoChunks);
        }

        let mut prev_end = 0usize;
        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.size == 0 || !(chunk.eps_mult > F::zero()) {
                return Err(ChunkError::InvalidLayout);
            }
            if i > 0 && chunk.start < prev_end {
                return Err(ChunkError::InvalidLayout);
            }
            prev_end = chunk.end();
        }

        if prev_end > max_block_size {
            return Err(ChunkError::ExceedsCapacity);
        }

        Ok(())
    }

    /// Run a closure over every live index, grouped by chunk, in index
    /// order. Used by the step kernels so inner loops stay SIMD-friendly
    /// and never touch halo gaps.
    pub fn for_each_index(&self, mut f: impl FnMut(usize)) {
        for chunk in &self.chunks {
            for i in chunk.range() {
                f(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(start: usize, size: usize) -> Chunk<f64> {
        Chunk::new(start, size, 1.0)
    }

    #[test]
    fn valid_layout_validates() {
        let mem = MemDist::new(vec![c(0, 4), c(6, 3), c(10, 2)]);
        assert!(mem.validate(12).is_ok());
    }

    #[test]
    fn empty_layout_is_no_chunks() {
        let mem: MemDist<f64> = MemDist::new(vec![]);
        assert_eq!(mem.validate(10), Err(ChunkError::NoChunks));
    }

    #[test]
    fn zero_size_chunk_is_invalid() {
        let mem = MemDist::new(vec![c(0, 0)]);
        assert_eq!(mem.validate(10), Err(ChunkError::InvalidLayout));
    }

    #[test]
    fn overlapping_chunks_are_invalid() {
        let mem = MemDist::new(vec![c(0, 5), c(3, 4)]);
        assert_eq!(mem.validate(10), Err(ChunkError::InvalidLayout));
    }

    #[test]
    fn out_of_order_chunks_are_invalid() {
        let mem = MemDist::new(vec![c(6, 2), c(0, 4)]);
        assert_eq!(mem.validate(10), Err(ChunkError::InvalidLayout));
    }

    #[test]
    fn exceeding_capacity_is_rejected() {
        let mem = MemDist::new(vec![c(0, 4), c(4, 8)]);
        assert_eq!(mem.validate(10), Err(ChunkError::ExceedsCapacity));
    }

    #[test]
    fn nonpositive_eps_mult_is_invalid() {
        let mem = MemDist::new(vec![Chunk::new(0, 4, 0.0)]);
        assert_eq!(mem.validate(10), Err(ChunkError::InvalidLayout));
    }
}
