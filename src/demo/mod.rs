//! Minimal demo drivers exercising the solver end to end on toy, non-PDE
//! right-hand sides — not the excluded 3-D phase-field driver, just enough
//! of a caller to prove the public API is usable (mirrors the teacher's
//! `examples`/`tasks` split, collapsed into one module given the much
//! smaller scope here).

pub mod harmonic_oscillator;
pub mod scalar_decay;
