//! The floating-point precision the solver is built for.

use num_traits::Float;

/// Floating-point precision used throughout the solver.
///
/// The original C implementation picks `FLOAT` (`float`/`double`/`long
/// double`) at build time via a typedef. Rust has no portable
/// extended-precision primitive, so the choice becomes a generic type
/// parameter instead: callers monomorphize over `f32` or `f64`.
pub trait Scalar:
    Float + Copy + Default + Send + Sync + std::fmt::Debug + std::iter::Sum<Self> + 'static
{
    /// `f64` -> `Self`, used when decoding control values off the wire.
    fn from_f64(v: f64) -> Self;
    /// `Self` -> `f64`, used when a control value needs to cross the
    /// `Communicator` (only scalars ever do; the state buffer never does).
    fn to_f64(self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
