use super::{single_rank_session, static_rhs};

/// `spec.md` §8 scenario 2: harmonic oscillator, one full period.
#[test]
fn harmonic_oscillator_one_period() {
    let (mut solver, mut session) = single_rank_session(vec![1.0, 0.0], 0.1, 0.0, 1e-8);
    let mut meta = static_rhs(|_t, x, dx_dt| {
        dx_dt[0] = x[1];
        dx_dt[1] = -x[0];
    });

    let t_final = 2.0 * std::f64::consts::PI;
    let outcome = crate::solver::solve(&mut solver, &mut session, t_final, &mut meta, None).unwrap();

    assert!(matches!(outcome, crate::error::SolveOutcome::Finished));
    assert!((session.state[0] - 1.0).abs() < 1e-4);
    assert!(session.state[1].abs() < 1e-4);
}
