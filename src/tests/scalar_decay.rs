use super::{single_rank_session, static_rhs};
use crate::session::DeltaMode;

/// `spec.md` §8 scenario 1: scalar exponential decay.
#[test]
fn scalar_exponential_decay() {
    let (mut solver, mut session) = single_rank_session(vec![1.0], 0.1, 0.0, 1e-6);
    let mut meta = static_rhs(|_t, x, dx_dt| dx_dt[0] = -x[0]);

    let outcome = crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, None).unwrap();

    assert_eq!(session.delta_mode, DeltaMode::Global);
    assert!(matches!(outcome, crate::error::SolveOutcome::Finished));
    assert!((session.state[0] - std::f64::consts::E.recip()).abs() < 1e-5);
    assert!(session.steps_accepted >= 1);
    assert!(session.steps_total >= session.steps_accepted);
}
