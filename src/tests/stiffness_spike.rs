use super::{single_rank_session, static_rhs};

/// `spec.md` §8 scenario 3: adaptivity under a stiffness spike — the
/// step-control loop must reject some attempts before converging.
#[test]
fn adaptivity_under_stiffness_spike() {
    let (mut solver, mut session) = single_rank_session(vec![0.0], 1e-3, 0.0, 1e-5);
    let mut meta = static_rhs(|t, x, dx_dt| {
        dx_dt[0] = -1000.0 * (x[0] - t.cos()) - t.sin();
    });

    let outcome = crate::solver::solve(&mut solver, &mut session, 1.0, &mut meta, None).unwrap();

    assert!(matches!(outcome, crate::error::SolveOutcome::Finished));
    assert!(session.steps_total > session.steps_accepted);
    assert!((session.state[0] - 1.0_f64.cos()).abs() < 1e-3);
}
