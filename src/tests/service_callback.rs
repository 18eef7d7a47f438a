use std::sync::atomic::{AtomicU32, Ordering};

use super::{single_rank_session, static_rhs};
use crate::error::SolveOutcome;

/// `spec.md` §8 scenario 5: a service callback that breaks on the third
/// acceptance, and a resumed `Solve` that reproduces the uninterrupted
/// trajectory bit-for-bit on a single rank.
#[test]
fn service_callback_break_and_resume() {
    let (mut solver, mut session) = single_rank_session(vec![1.0], 0.1, 0.0, 1e-6);
    let mut meta = static_rhs(|_t, x, dx_dt| dx_dt[0] = -x[0]);

    let count = AtomicU32::new(0);
    let mut service = |_t_final: f64, _session: &crate::session::Session<f64>| -> i32 {
        let n = count.fetch_add(1, Ordering::SeqCst) + 1;
        i32::from(n == 3)
    };

    let outcome =
        crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, Some(&mut service))
            .unwrap();

    assert!(matches!(outcome, SolveOutcome::Interrupted));
    assert_eq!(session.steps_accepted, 3);
    assert!(session.t < 1.0);

    let resumed = crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, None).unwrap();
    assert!(matches!(resumed, SolveOutcome::Finished));
    assert_eq!(session.t, 1.0);
    solver.cleanup();

    let (mut solver2, mut session2) = single_rank_session(vec![1.0], 0.1, 0.0, 1e-6);
    let mut meta2 = static_rhs(|_t, x, dx_dt| dx_dt[0] = -x[0]);
    let uninterrupted =
        crate::solver::solve(&mut solver2, &mut session2, 1.0, &mut meta2, None).unwrap();

    assert!(matches!(uninterrupted, SolveOutcome::Finished));
    assert_eq!(session.state[0], session2.state[0]);
}
