//! The outer integration loop (`spec.md` §4.3, `Solve`).

use crate::comm::{Command, Communicator};
use crate::error::{ChunkError, ReturnCode, SolveError, SolveOutcome};
use crate::rhs::{MetaSelector, ServiceCallback};
use crate::scalar::Scalar;
use crate::session::{DeltaMode, Session};

use super::Solver;

const NAN_SHRINK: f64 = 10.0;
const NAN_FLOOR: f64 = 1e-11;

/// `Solve(t_final, &mut session)` (`spec.md` §4.3).
///
/// `meta_f` and `service` are passed in rather than stored on `Session` (see
/// `DESIGN.md`): storing them there would force `&mut session` and the
/// `&Session` handed to the service callback to alias. Both are still pure
/// functions of session state, so calling `meta_f` once more at the top of a
/// resumed `Solve` after an interrupt is harmless (`spec.md` §4.3, §9).
pub fn solve<F: Scalar, C: Communicator>(
    solver: &mut Solver<F, C>,
    session: &mut Session<F>,
    t_final: F,
    meta_f: &mut dyn MetaSelector<F>,
    mut service: Option<&mut dyn ServiceCallback<F>>,
) -> Result<SolveOutcome, SolveError> {
    let master_rank = solver.master_rank();
    let is_master = solver.comm().is_master(master_rank);

    // Pre-step 1: every rank's local contract check, agreed by min-reduce.
    let mut local_err: Option<SolveError> = None;
    if let Err(e) = solver.validate_mem(&session.mem) {
        local_err = Some(match e {
            ChunkError::ExceedsCapacity => SolveError::CapacityExceeded,
            ChunkError::Uninitialised => SolveError::NotInitialised,
            ChunkError::InvalidLayout | ChunkError::NoChunks => {
                SolveError::InvalidSession(ReturnCode::InvalidSession)
            }
        });
    }
    if is_master && !(session.delta > F::zero()) {
        local_err = Some(SolveError::InvalidSession(ReturnCode::InvalidSession));
    }
    let local_code = local_err.map(SolveError::code).unwrap_or(0);
    let reduced_code = solver.comm().all_reduce_min_i32(local_code);
    if reduced_code != 0 {
        return Err(match local_err {
            Some(e) if e.code() == reduced_code => e,
            _ => SolveError::OtherRankFailed(reduced_code),
        });
    }

    solver.last_nan = false;

    // Pre-step 2: broadcast the scalars every rank must agree on.
    let handle_nan = solver.comm().broadcast_bool(solver.handle_nan, master_rank);
    let t_final = F::from_f64(solver.comm().broadcast_f64(t_final.to_f64(), master_rank));
    let mut t = F::from_f64(solver.comm().broadcast_f64(session.t.to_f64(), master_rank));
    let mut h = F::from_f64(solver.comm().broadcast_f64(session.h.to_f64(), master_rank));
    let delta = F::from_f64(solver.comm().broadcast_f64(session.delta.to_f64(), master_rank));
    let delta_mode_is_local = solver
        .comm()
        .broadcast_bool(session.delta_mode == DeltaMode::Local, master_rank);
    let delta_mode = if delta_mode_is_local {
        DeltaMode::Local
    } else {
        DeltaMode::Global
    };

    session.t = t;
    session.h = h;
    session.delta = delta;
    session.delta_mode = delta_mode;

    if t == t_final {
        return Ok(SolveOutcome::Finished);
    }

    // Pre-step 3/4: auto-h and sign alignment.
    let mut pending_finish = h == F::zero() || (t_final - t).abs() <= h.abs();
    if pending_finish {
        h = t_final - t;
    }
    let direction = if t_final >= t { F::one() } else { -F::one() };
    h = h.abs() * direction;

    let mut rhs = meta_f.select(session);

    loop {
        let was_finish_attempt = pending_finish;

        session.steps_total += 1;
        let (local_eps, local_nan) = solver.attempt(&session.mem, rhs.as_ref(), t, h, &session.state);

        let nan_triggered = if handle_nan {
            solver.comm().all_reduce_or_bool(local_nan)
        } else {
            false
        };
        if nan_triggered {
            solver.last_nan = true;
        }

        let mut reduced_eps = solver.comm().all_reduce_max(local_eps);
        if delta_mode == DeltaMode::Local {
            reduced_eps = (h / F::from_f64(3.0)).abs() * reduced_eps;
        }

        let command = if is_master {
            if nan_triggered {
                if (h.to_f64() / (t_final - t).to_f64()).abs() < NAN_FLOOR {
                    Command::NanFloor
                } else {
                    Command::Retry
                }
            } else {
                let accept = reduced_eps < delta || h.abs() < session.h_min;
                let h_new = if reduced_eps > F::zero() {
                    F::from_f64(0.8) * (delta / reduced_eps).powf(F::from_f64(0.2)) * h
                } else {
                    F::from_f64(2.0) * h
                };
                if accept {
                    let t_after = if was_finish_attempt { t_final } else { t + h };
                    let remaining = t_final - t_after;
                    let next_finish = remaining != F::zero() && remaining.abs() <= h_new.abs();
                    Command::Accept {
                        next_h: h_new,
                        next_finish,
                    }
                } else {
                    Command::Reject { next_h: h_new }
                }
            }
        } else {
            Command::Retry
        };
        let command = solver.comm().broadcast_command(command, master_rank);

        match command {
            Command::NanFloor => {
                session.h = h / F::from_f64(NAN_SHRINK);
                return Ok(SolveOutcome::NanBreak);
            }
            Command::Retry => {
                h = h / F::from_f64(NAN_SHRINK);
                pending_finish = false;
            }
            Command::Reject { next_h } => {
                h = next_h;
                pending_finish = false;
            }
            Command::Accept { next_h, next_finish } => {
                solver.commit(&session.mem, h, &mut session.state);
                session.steps_accepted += 1;
                session.t = if was_finish_attempt { t_final } else { t + h };
                t = session.t;

                // Run on every accepted step, including the finishing one —
                // `Finished` below supersedes a break request rather than
                // racing it (`spec.md` §4.3, §9).
                let mut break_requested = false;
                if let Some(service) = service.as_deref_mut() {
                    let local_ret = service.call(t_final, session);
                    let master_says_break = is_master && local_ret != 0;
                    break_requested = solver.comm().broadcast_bool(master_says_break, master_rank);
                }

                if was_finish_attempt {
                    session.h = next_h;
                    return Ok(SolveOutcome::Finished);
                }

                rhs = meta_f.select(session);

                // `next_h` is the natural, untruncated proposal and is what
                // `session.h` reports; only the working `h` driving the next
                // attempt is truncated to land exactly on `t_final`.
                session.h = next_h;
                h = if next_finish { t_final - t } else { next_h };
                pending_finish = next_finish;

                if break_requested {
                    return Ok(SolveOutcome::Interrupted);
                }
            }
        }
    }
}
