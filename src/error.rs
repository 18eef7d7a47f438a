//! Stable, cross-rank return codes.
//!
//! The original keeps these as bare `int` return codes so that every rank
//! can agree on a failure without sharing a type definition. We keep the
//! same numeric values (`spec.md` §7) but wrap them in typed enums so that
//! callers get `match`-exhaustiveness and a real `Error` impl, while
//! `.code()` always recovers the wire value.

use thiserror::Error;

/// The stable, `repr(i32)` wire code for every outcome the solver can
/// report. Kept around mainly so `ValidateMem`/`Solve` callers that need
/// the raw cross-rank-comparable integer (e.g. to `MPI_Allreduce` it
/// themselves) can get at it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(i32)]
pub enum ReturnCode {
    #[error("ok")]
    Ok = 0,
    #[error("interrupted by service callback")]
    Interrupted = 1,
    #[error("invalid session")]
    InvalidSession = -2,
    #[error("solver not initialised")]
    NotInitialised = -3,
    #[error("NaN floor reached")]
    NanBreak = -4,
    #[error("chunk layout exceeds capacity")]
    CapacityExceeded = -5,
    #[error("a peer rank failed")]
    OtherRankFailed = -6,
}

impl ReturnCode {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// `Init` failures (`spec.md` §6). Distinct from [`ChunkError`]/[`SolveError`]
/// because these are raised before a [`crate::solver::Solver`] exists at
/// all, so there is no stable wire code to agree on across ranks yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("max_block_size must be nonzero")]
    InvalidSize,
    #[error("solver already initialised; call Cleanup first")]
    AlreadyInitialised,
}

/// Chunk-layout validation failures (`spec.md` §3, §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("solver not initialised")]
    Uninitialised,
    #[error("chunk layout exceeds max_block_size")]
    ExceedsCapacity,
    #[error("chunks overlap, are out of order, or have a nonpositive size/eps_mult")]
    InvalidLayout,
    #[error("no chunks in layout")]
    NoChunks,
}

impl From<ChunkError> for ReturnCode {
    fn from(e: ChunkError) -> Self {
        match e {
            ChunkError::Uninitialised => ReturnCode::NotInitialised,
            ChunkError::ExceedsCapacity => ReturnCode::CapacityExceeded,
            ChunkError::InvalidLayout | ChunkError::NoChunks => ReturnCode::InvalidSession,
        }
    }
}

/// Contract violations detected at entry to `Solve` (`spec.md` §4.3 step 1).
/// All ranks agree on the *class* of failure; only the offending rank keeps
/// its precise code, everyone else reports [`OtherRankFailed`].
///
/// [`OtherRankFailed`]: SolveError::OtherRankFailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invalid session: {0}")]
    InvalidSession(ReturnCode),
    #[error("solver not initialised")]
    NotInitialised,
    #[error("chunk layout exceeds capacity")]
    CapacityExceeded,
    #[error("a peer rank reported a fatal error (code {0})")]
    OtherRankFailed(i32),
}

impl SolveError {
    pub fn code(self) -> i32 {
        match self {
            SolveError::InvalidSession(_) => ReturnCode::InvalidSession.code(),
            SolveError::NotInitialised => ReturnCode::NotInitialised.code(),
            SolveError::CapacityExceeded => ReturnCode::CapacityExceeded.code(),
            SolveError::OtherRankFailed(_) => ReturnCode::OtherRankFailed.code(),
        }
    }
}

/// A `Solve` call that did not hit a hard contract violation. Distinct from
/// [`SolveError`] because in every one of these cases the session is left
/// in a valid, resumable state (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Integration reached `t_final`. `session.t == t_final` exactly.
    Finished,
    /// The service callback requested a stop after an accepted step.
    Interrupted,
    /// NaN handling is on and the relative step floor was hit.
    NanBreak,
}

impl SolveOutcome {
    pub fn code(self) -> i32 {
        match self {
            SolveOutcome::Finished => ReturnCode::Ok.code(),
            SolveOutcome::Interrupted => ReturnCode::Interrupted.code(),
            SolveOutcome::NanBreak => ReturnCode::NanBreak.code(),
        }
    }
}
