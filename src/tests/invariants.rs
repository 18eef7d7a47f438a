use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::{single_rank_session, static_rhs};
use crate::error::SolveOutcome;

/// `spec.md` §8: `Solve` with `t_final == session.t` returns immediately,
/// evaluates the right-hand-side zero times, and leaves state unchanged.
#[test]
fn no_op_solve_touches_nothing() {
    let (mut solver, mut session) = single_rank_session(vec![3.0], 0.1, 0.0, 1e-6);
    let calls = Arc::new(AtomicU32::new(0));
    let calls_rhs = calls.clone();
    let mut meta = static_rhs(move |_t, x, dx_dt| {
        calls_rhs.fetch_add(1, Ordering::SeqCst);
        dx_dt[0] = -x[0];
    });

    let outcome = crate::solver::solve(&mut solver, &mut session, 0.0, &mut meta, None).unwrap();

    assert!(matches!(outcome, SolveOutcome::Finished));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.state[0], 3.0);
    assert_eq!(session.steps_total, 0);
    assert_eq!(session.steps_accepted, 0);
}

/// `spec.md` §8: sign-alignment leaves `session.t == t_final` exactly, and
/// `steps_accepted <= steps_total` always.
#[test]
fn exact_arrival_and_monotone_counters() {
    let (mut solver, mut session) = single_rank_session(vec![1.0], 0.1, 0.0, 1e-6);
    let mut meta = static_rhs(|_t, x, dx_dt| dx_dt[0] = -x[0]);

    let outcome = crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, None).unwrap();

    assert!(matches!(outcome, SolveOutcome::Finished));
    assert_eq!(session.t, 1.0);
    assert!(session.steps_accepted <= session.steps_total);
}
