use std::sync::Arc;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use logger_bro::Logger;
use ndarray::array;

use crate::chunk::MemDist;
use crate::comm::thread::ThreadCommunicator;
use crate::comm::Communicator;
use crate::rhs::StaticRhs;
use crate::session::{Session, SessionConfig};
use crate::solver::Solver;

const NUM_RANKS: usize = 3;
const T_FINAL: f64 = 1.0;

/// The solver's own typed config surface loaded via `serde_json`
/// (`SPEC_FULL.md` §6.3), rather than resurrecting the excluded
/// parameter-file grammar.
const CONFIG_JSON: &str = r#"{"h":0.1,"h_min":0.0,"delta":1e-6,"delta_mode":"Global"}"#;

/// Integrates `dx/dt = -x` from `t=0` to `t=1` across `NUM_RANKS` simulated
/// ranks, each holding an identical copy of the (trivially small) state —
/// enough to exercise the broadcast/all-reduce protocol end to end without
/// a real spatial partition.
pub fn run() -> Result<()> {
    let team = ThreadCommunicator::build_team(NUM_RANKS);
    let results: Vec<Result<()>> = crossbeam::thread::scope(|scope| {
        team.into_iter()
            .map(|comm| scope.spawn(move |_| rank_main(comm)))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| Err(anyhow!("rank thread panicked"))))
            .collect()
    })
    .map_err(|_| anyhow!("scalar decay demo panicked"))?;

    for r in results {
        r?;
    }
    Ok(())
}

fn rank_main(comm: ThreadCommunicator) -> Result<()> {
    let rank = comm.rank();
    let logger = Logger::new(12);

    let mut solver: Solver<f64, _> = Solver::init(1, comm, 0).map_err(|e| anyhow!("init: {e}"))?;
    let mem = MemDist::dense(1);
    let config: SessionConfig<f64> =
        serde_json::from_str(CONFIG_JSON).map_err(|e| anyhow!("config: {e}"))?;
    let mut session = Session::new(config, 0.0_f64, array![1.0_f64], mem);
    let mut meta = StaticRhs::new(Arc::new(
        |_t: f64, x: &ndarray::Array1<f64>, dx_dt: &mut ndarray::Array1<f64>| {
            dx_dt[0] = -x[0];
        },
    ));

    // Only rank 0 renders a bar, but the callback itself (and the collective
    // broadcast inside `solve` that it triggers) must run on every rank
    // uniformly — a `Some`/`None` split across ranks would desynchronise
    // the broadcast.
    let pb = (rank == 0).then(|| {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message("scalar_decay");
        pb
    });
    let pb_for_service = pb.clone();
    let mut service = move |_t_final: f64, session: &Session<f64>| -> i32 {
        if let Some(pb) = &pb_for_service {
            pb.set_position(((session.t / T_FINAL) * 100.0).round() as u64);
        }
        0
    };

    let outcome = crate::solver::solve(
        &mut solver,
        &mut session,
        T_FINAL,
        &mut meta,
        Some(&mut service),
    )
    .map_err(|e| anyhow!("solve: {e}"))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if rank == 0 {
        logger_bro::info!(
            logger,
            "scalar_decay",
            "{outcome:?}: x={:.8} (e^-1={:.8}), steps {}/{}",
            session.state[0],
            std::f64::consts::E.recip(),
            session.steps_accepted,
            session.steps_total
        );
    }

    solver.cleanup();
    Ok(())
}
