//! Distributed adaptive RK-Merson ODE integrator for method-of-lines PDE
//! discretizations.
//!
//! The three load-bearing pieces: the sparse [`chunk`] layout describing a
//! rank's live state indices, the [`comm`] transport abstraction over
//! real/simulated clusters, and the [`solver`] core implementing the
//! Merson step and the cluster-wide step-acceptance protocol.

pub mod chunk;
pub mod comm;
pub mod demo;
pub mod error;
pub mod rhs;
pub mod scalar;
pub mod session;
pub mod solver;

pub use chunk::{Chunk, MemDist};
pub use comm::{Command, Communicator};
pub use error::{ChunkError, InitError, ReturnCode, SolveError, SolveOutcome};
pub use rhs::{MetaSelector, RightHandSide, ServiceCallback, StaticRhs};
pub use scalar::Scalar;
pub use session::{DeltaMode, Session, SessionConfig};
pub use solver::Solver;

#[cfg(test)]
mod tests;
