//! The client-owned solution handle (`spec.md` §3, "Solution handle
//! (Session)").

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::chunk::MemDist;
use crate::scalar::Scalar;

/// Normalisation convention for the Merson error estimator against
/// `delta` (`spec.md` §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaMode {
    /// Compare the raw reduced error `eps` against `delta`.
    Global,
    /// Compare `|h/3| * eps` against `delta` — tracks the per-step
    /// increment rather than the state magnitude.
    Local,
}

/// The solver's own configuration surface (`spec.md` §6). Deliberately
/// small and typed — parameter-file parsing and expression evaluation stay
/// out of scope, owned by whatever driver builds one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig<F> {
    /// Initial/proposed step. `0` means "auto": filled with `t_final - t`
    /// on the first call to `Solve`.
    pub h: F,
    /// Force-accept threshold. `0` disables force-accept.
    pub h_min: F,
    /// Tolerance. Must be strictly positive on the master rank.
    pub delta: F,
    pub delta_mode: DeltaMode,
}

/// Client-owned aggregate holding everything `Solve` mutates across calls
/// (`spec.md` §3). The right-hand-side meta-selector and service callback
/// are passed directly to `Solver::solve` rather than stored here — storing
/// them in `Session` would force `&mut Session` and `&Session` to alias
/// when the service callback is invoked with a session snapshot (see
/// DESIGN.md).
pub struct Session<F: Scalar> {
    pub t: F,
    pub h: F,
    pub h_min: F,
    pub delta: F,
    pub delta_mode: DeltaMode,
    pub state: Array1<F>,
    pub mem: MemDist<F>,
    pub steps_accepted: u64,
    pub steps_total: u64,
}

impl<F: Scalar> Session<F> {
    pub fn new(config: SessionConfig<F>, t0: F, state: Array1<F>, mem: MemDist<F>) -> Self {
        Self {
            t: t0,
            h: config.h,
            h_min: config.h_min,
            delta: config.delta,
            delta_mode: config.delta_mode,
            state,
            mem,
            steps_accepted: 0,
            steps_total: 0,
        }
    }
}
