//! Right-hand-side, meta-selector and service-callback contracts
//! (`spec.md` §3, §6).

use std::sync::Arc;

use ndarray::Array1;

use crate::scalar::Scalar;
use crate::session::Session;

/// `Dx/Dt = f(t, x)`. Must write only within the chunks defined by the
/// session's [`crate::chunk::MemDist`]; any halo synchronisation with peer
/// ranks is the implementer's responsibility and must happen on every rank
/// for the same "virtual step" (`spec.md` §3).
pub trait RightHandSide<F: Scalar>: Send + Sync {
    fn eval(&self, t: F, x: &Array1<F>, dx_dt: &mut Array1<F>);
}

impl<F, Fun> RightHandSide<F> for Fun
where
    F: Scalar,
    Fun: Fn(F, &Array1<F>, &mut Array1<F>) + Send + Sync,
{
    fn eval(&self, t: F, x: &Array1<F>, dx_dt: &mut Array1<F>) {
        self(t, x, dx_dt)
    }
}

/// Chooses which [`RightHandSide`] to use for the *next* step. Invoked once
/// before the first step and once after every accepted step. Must be a pure
/// function of the session's state — the solver is free to call it more
/// than once for the same state (e.g. once more at the top of a resumed
/// `Solve` after a service-callback break) and must get back the same
/// answer. Must also return identically on every rank for a given step
/// ordinal (`spec.md` §3, §4.3).
pub trait MetaSelector<F: Scalar>: Send {
    fn select(&mut self, session: &Session<F>) -> Arc<dyn RightHandSide<F>>;
}

impl<F, Fun> MetaSelector<F> for Fun
where
    F: Scalar,
    Fun: FnMut(&Session<F>) -> Arc<dyn RightHandSide<F>> + Send,
{
    fn select(&mut self, session: &Session<F>) -> Arc<dyn RightHandSide<F>> {
        self(session)
    }
}

/// A [`MetaSelector`] that always returns the same right-hand-side — the
/// common case where the discretisation never alternates.
pub struct StaticRhs<F: Scalar> {
    rhs: Arc<dyn RightHandSide<F>>,
}

impl<F: Scalar> StaticRhs<F> {
    pub fn new(rhs: Arc<dyn RightHandSide<F>>) -> Self {
        Self { rhs }
    }
}

impl<F: Scalar> MetaSelector<F> for StaticRhs<F> {
    fn select(&mut self, _session: &Session<F>) -> Arc<dyn RightHandSide<F>> {
        self.rhs.clone()
    }
}

/// Optional post-step hook. Invoked on every rank after every accepted
/// step; only the master's return value is consulted to decide whether to
/// break out of `Solve` (`spec.md` §4.3, §6).
pub trait ServiceCallback<F: Scalar>: Send {
    fn call(&mut self, t_final: F, session: &Session<F>) -> i32;
}

impl<F, Fun> ServiceCallback<F> for Fun
where
    F: Scalar,
    Fun: FnMut(F, &Session<F>) -> i32 + Send,
{
    fn call(&mut self, t_final: F, session: &Session<F>) -> i32 {
        self(t_final, session)
    }
}
