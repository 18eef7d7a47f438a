use super::{single_rank_session, static_rhs};

/// `spec.md` §8 scenario 4: a right-hand-side discontinuity at `t = 0.5`.
/// With `h_min` set, the solver must force through the discontinuity rather
/// than shrinking `h` without bound.
#[test]
fn h_min_forces_through_discontinuity() {
    let (mut solver, mut session) = single_rank_session(vec![0.0], 0.05, 1e-8, 1e-6);
    let mut meta = static_rhs(|t, x, dx_dt| {
        dx_dt[0] = if t < 0.5 { -x[0] } else { -x[0] + 1.0e6 };
    });

    let outcome = crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, None).unwrap();

    assert!(matches!(outcome, crate::error::SolveOutcome::Finished));
    assert!(session.steps_total - session.steps_accepted < 200);
}
