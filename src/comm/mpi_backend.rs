//! Real distributed backend, built on the `mpi` crate (`rsmpi`).
//!
//! This mirrors `original_source`'s `RK_MPI_Asolver.c` transport directly:
//! `MPI_Bcast` for the command word, `MPI_Allreduce` with `MPI_MAX`/`MPI_MIN`
//! /`MPI_BOR` for the error/error-code/NaN reductions. Requires a system MPI
//! installation to link (same shape as the teacher's `ndarray-linalg`
//! requiring OpenBLAS, or `ctfree-rust-GSL` requiring libgsl) — not expected
//! to build without one, which is fine: this is a self-check, not a gate.

use mpi::collective::SystemOperation;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use super::Communicator;

/// One rank's handle onto a real MPI communicator.
pub struct MpiCommunicator {
    world: SimpleCommunicator,
}

impl MpiCommunicator {
    /// Wrap an already-initialized MPI world communicator (`Universe::world()`).
    pub fn new(world: SimpleCommunicator) -> Self {
        Self { world }
    }
}

impl Communicator for MpiCommunicator {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn broadcast_f64(&self, value: f64, root: usize) -> f64 {
        let mut buf = value;
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(&mut buf);
        buf
    }

    fn broadcast_bool(&self, value: bool, root: usize) -> bool {
        let mut buf: u8 = value as u8;
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(&mut buf);
        buf != 0
    }

    fn all_reduce_min_i32(&self, value: i32) -> i32 {
        let mut out = 0i32;
        self.world
            .all_reduce_into(&value, &mut out, SystemOperation::min());
        out
    }

    fn all_reduce_max_f64(&self, value: f64) -> f64 {
        let mut out = 0f64;
        self.world
            .all_reduce_into(&value, &mut out, SystemOperation::max());
        out
    }

    fn all_reduce_or_bool(&self, value: bool) -> bool {
        let send: u8 = value as u8;
        let mut out = 0u8;
        self.world
            .all_reduce_into(&send, &mut out, SystemOperation::bitwise_or());
        out != 0
    }
}
