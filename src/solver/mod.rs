//! Process-wide solver handle: scratch buffers, cluster transport and the
//! NaN-handling gate (`spec.md` §3, §5, §6).

mod solve;
mod step;

pub use solve::solve;

use std::cell::Cell;

use ndarray::Array1;

use crate::chunk::MemDist;
use crate::comm::Communicator;
use crate::error::{ChunkError, InitError};
use crate::scalar::Scalar;

thread_local! {
    /// Init latch (`spec.md` §3: "Process-wide state `S`... initialised at
    /// most once"). The original's "process" is one MPI rank, which is one
    /// OS process; the natural Rust analogue of that unit of execution is
    /// the thread, not the process, since the thread-simulated
    /// `Communicator` backend runs several ranks as separate OS threads
    /// inside one process (`spec.md` §9, DESIGN.md). A plain `thread_local`
    /// `Cell` rather than a shared `AtomicBool` keeps each simulated rank's
    /// latch independent.
    static INITIALISED: Cell<bool> = const { Cell::new(false) };
}

/// Four Merson coefficient buffers (`K2` reuses `K3`'s storage, since it is
/// never needed after `K3` is produced) plus one argument-staging buffer,
/// each of capacity `max_block_size` (`spec.md` §3).
struct Scratch<F> {
    k1: Array1<F>,
    k3: Array1<F>,
    k4: Array1<F>,
    k5: Array1<F>,
    aux: Array1<F>,
}

impl<F: Scalar> Scratch<F> {
    fn new(capacity: usize) -> Self {
        Self {
            k1: Array1::zeros(capacity),
            k3: Array1::zeros(capacity),
            k4: Array1::zeros(capacity),
            k5: Array1::zeros(capacity),
            aux: Array1::zeros(capacity),
        }
    }
}

/// The solver core: `Step`/`Solve` plus the scratch buffers and cluster
/// handle they operate through.
pub struct Solver<F: Scalar, C: Communicator> {
    scratch: Scratch<F>,
    comm: C,
    master_rank: usize,
    capacity: usize,
    handle_nan: bool,
    last_nan: bool,
}

impl<F: Scalar, C: Communicator> Solver<F, C> {
    /// `Init(max_block_size, comm, master_rank)` (`spec.md` §6). Allocates
    /// the five scratch buffers and records the communicator and master
    /// rank. Fails if another `Solver` in this process is still live.
    pub fn init(max_block_size: usize, comm: C, master_rank: usize) -> Result<Self, InitError> {
        if max_block_size == 0 {
            return Err(InitError::InvalidSize);
        }
        let already_initialised = INITIALISED.with(|flag| flag.replace(true));
        if already_initialised {
            return Err(InitError::AlreadyInitialised);
        }
        Ok(Self {
            scratch: Scratch::new(max_block_size),
            comm,
            master_rank,
            capacity: max_block_size,
            handle_nan: false,
            last_nan: false,
        })
    }

    /// `Cleanup()` (`spec.md` §6). Frees the scratch buffers and resets the
    /// init latch so a future `init` can succeed; `Drop` does the same for
    /// a `Solver` that is simply let go out of scope instead.
    pub fn cleanup(self) {
        drop(self);
    }

    /// `HandleNaN(bool)` — toggle the NaN-handling gate. Meaningful on the
    /// master rank; `Solve` broadcasts it into every rank's session at the
    /// top of each call.
    pub fn set_handle_nan(&mut self, enabled: bool) {
        self.handle_nan = enabled;
    }

    /// `CheckNaN()` — did the last `Solve` call on this rank see a NaN.
    pub fn check_nan(&self) -> bool {
        self.last_nan
    }

    /// `ValidateMem(mem)` (`spec.md` §4.1/§6). Pure, side-effect free.
    pub fn validate_mem(&self, mem: &MemDist<F>) -> Result<(), ChunkError> {
        mem.validate(self.capacity)
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    pub fn master_rank(&self) -> usize {
        self.master_rank
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<F: Scalar, C: Communicator> Drop for Solver<F, C> {
    /// Belt-and-braces release of the init latch: `cleanup` already does
    /// this, but letting a `Solver` simply go out of scope (a panic
    /// unwinding past it, a test that forgets the explicit call) must not
    /// leave the thread's latch stuck.
    fn drop(&mut self) {
        INITIALISED.with(|flag| flag.set(false));
    }
}
