mod h_min_force_accept;
mod harmonic_oscillator;
mod invariants;
mod scalar_decay;
mod service_callback;
mod stiffness_spike;

use std::sync::Arc;

use crate::chunk::MemDist;
use crate::comm::thread::ThreadCommunicator;
use crate::rhs::{RightHandSide, StaticRhs};
use crate::session::{DeltaMode, Session, SessionConfig};
use crate::solver::Solver;

/// Common fixture: a fresh single-rank solver plus a dense, one-chunk
/// session wrapping `state0` (`spec.md` §8: round-trip scenarios run
/// single-rank, `delta_mode = GLOBAL`).
fn single_rank_session(
    state0: Vec<f64>,
    h: f64,
    h_min: f64,
    delta: f64,
) -> (Solver<f64, ThreadCommunicator>, Session<f64>) {
    let comm = ThreadCommunicator::solo();
    let capacity = state0.len();
    let solver = Solver::init(capacity, comm, 0).expect("fresh solver initialises");
    let mem = MemDist::dense(capacity);
    let config = SessionConfig {
        h,
        h_min,
        delta,
        delta_mode: DeltaMode::Global,
    };
    let session = Session::new(config, 0.0, ndarray::Array1::from_vec(state0), mem);
    (solver, session)
}

fn static_rhs(
    f: impl Fn(f64, &ndarray::Array1<f64>, &mut ndarray::Array1<f64>) + Send + Sync + 'static,
) -> StaticRhs<f64> {
    StaticRhs::new(Arc::new(f) as Arc<dyn RightHandSide<f64>>)
}
