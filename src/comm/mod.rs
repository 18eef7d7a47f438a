//! Cluster transport: the collective operations the solver needs, behind a
//! trait, so the protocol in `crate::solver` is agnostic to whether ranks
//! are real MPI processes or threads inside one.
//!
//! Grounded on the collective calls in `RK_MPI_Asolver.c` /
//! `RK_MPI_SAsolver_hybrid.c`: a broadcast of the per-iteration command, a
//! max-reduce of the error estimate, an OR-reduce of the NaN flag, and a
//! min-reduce of integer error codes during pre-flight checks.

pub mod thread;

#[cfg(feature = "mpi-backend")]
pub mod mpi_backend;

use crate::scalar::Scalar;

/// What the master decided to do after one step attempt. Broadcast
/// atomically each iteration (REDESIGN FLAGS, `spec.md` §9) in place of the
/// original's bitmask command word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<F> {
    /// NaN/Inf seen somewhere; not yet below the relative floor. Retry with
    /// `h / 10`.
    Retry,
    /// NaN/Inf persisted below the relative floor. `Solve` returns
    /// [`crate::error::SolveOutcome::NanBreak`].
    NanFloor,
    /// Error estimate exceeded tolerance and `h_min` did not force-accept.
    /// Retry with `next_h`.
    Reject { next_h: F },
    /// Step accepted. `next_finish` means the *following* step, if one is
    /// taken, should be pre-truncated to land exactly on `t_final`.
    Accept { next_h: F, next_finish: bool },
}

/// The collective operations `Solve` needs from the cluster. One instance
/// is shared by every rank participating in a calculation.
pub trait Communicator: Send + Sync {
    /// This process's rank, `0..size()`.
    fn rank(&self) -> usize;
    /// Total number of participating ranks.
    fn size(&self) -> usize;

    fn is_master(&self, master_rank: usize) -> bool {
        self.rank() == master_rank
    }

    /// Broadcast an `f64` control scalar from `root` to every rank.
    fn broadcast_f64(&self, value: f64, root: usize) -> f64;
    /// Broadcast a `bool` from `root` to every rank.
    fn broadcast_bool(&self, value: bool, root: usize) -> bool;
    /// Broadcast a [`Command`] from `root` to every rank. The payload is a
    /// handful of scalars, so this is implemented in terms of
    /// `broadcast_f64`/`broadcast_bool` plus a small integer tag.
    fn broadcast_command<F: Scalar>(&self, value: Command<F>, root: usize) -> Command<F> {
        let tag: i32 = match value {
            Command::Retry => 0,
            Command::NanFloor => 1,
            Command::Reject { .. } => 2,
            Command::Accept { .. } => 3,
        };
        let tag = self.broadcast_f64(tag as f64, root) as i32;
        match tag {
            0 => Command::Retry,
            1 => Command::NanFloor,
            2 => {
                let next_h = match value {
                    Command::Reject { next_h } => next_h.to_f64(),
                    _ => 0.0,
                };
                let next_h = self.broadcast_f64(next_h, root);
                Command::Reject {
                    next_h: F::from_f64(next_h),
                }
            }
            3 => {
                let (next_h, next_finish) = match value {
                    Command::Accept { next_h, next_finish } => (next_h.to_f64(), next_finish),
                    _ => (0.0, false),
                };
                let next_h = self.broadcast_f64(next_h, root);
                let next_finish = self.broadcast_bool(next_finish, root);
                Command::Accept {
                    next_h: F::from_f64(next_h),
                    next_finish,
                }
            }
            _ => unreachable!("broadcast tag out of range"),
        }
    }

    /// `MPI_MIN` over an `i32` (used for error-code pre-flight agreement).
    fn all_reduce_min_i32(&self, value: i32) -> i32;
    /// `MPI_MAX` over an `f64` (used for the reduced error estimate).
    fn all_reduce_max_f64(&self, value: f64) -> f64;
    /// `MPI_BOR` over a `bool` (used for the NaN vote).
    fn all_reduce_or_bool(&self, value: bool) -> bool;

    fn all_reduce_max<F: Scalar>(&self, value: F) -> F {
        F::from_f64(self.all_reduce_max_f64(value.to_f64()))
    }
}
