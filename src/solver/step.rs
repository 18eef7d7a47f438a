//! One Merson step attempt (`spec.md` §4.2, `step`).

use ndarray::Array1;
use rayon::prelude::*;

use crate::chunk::MemDist;
use crate::comm::Communicator;
use crate::rhs::RightHandSide;
use crate::scalar::Scalar;

use super::{Scratch, Solver};

impl<F: Scalar, C: Communicator> Solver<F, C> {
    /// Run the five-stage Merson construction over `mem`'s chunks, writing
    /// intermediate results into the solver's scratch buffers. Does not
    /// touch `x` or `t` — the caller decides accept/reject from the
    /// returned local error estimate and NaN flag, then calls [`Self::commit`]
    /// if accepted.
    ///
    /// Returns `(locally reduced error estimate, any non-finite value seen)`.
    pub(super) fn attempt(
        &mut self,
        mem: &MemDist<F>,
        rhs: &dyn RightHandSide<F>,
        t: F,
        h: F,
        x: &Array1<F>,
    ) -> (F, bool) {
        let third = F::one() / F::from_f64(3.0);
        let sixth = F::one() / F::from_f64(6.0);
        let eighth = F::one() / F::from_f64(8.0);
        let half = F::from_f64(0.5);
        let three_halves = F::from_f64(1.5);
        let two = F::from_f64(2.0);

        let Scratch { k1, k3, k4, k5, aux } = &mut self.scratch;

        rhs.eval(t, x, k1);

        aux.assign(x);
        mem.for_each_index(|i| aux[i] = x[i] + h * third * k1[i]);
        rhs.eval(t + h * third, aux, k3); // K2, staged in k3's storage

        aux.assign(x);
        mem.for_each_index(|i| aux[i] = x[i] + h * sixth * (k1[i] + k3[i]));
        rhs.eval(t + h * third, aux, k3); // overwritten with the real K3

        aux.assign(x);
        mem.for_each_index(|i| aux[i] = x[i] + h * eighth * (k1[i] + F::from_f64(3.0) * k3[i]));
        rhs.eval(t + h * half, aux, k4);

        aux.assign(x);
        mem.for_each_index(|i| {
            aux[i] = x[i] + h * (half * k1[i] - three_halves * k3[i] + two * k4[i])
        });
        rhs.eval(t + h, aux, k5);

        // Chunk-parallel max/NaN reduction (`spec.md` §4.4: "the step kernels
        // are embarrassingly parallel across state indices within each
        // chunk... a manual critical-section fold" — here a `rayon` tree
        // reduction over chunks stands in for that fold).
        mem.chunks()
            .par_iter()
            .map(|chunk| {
                let mut local_max = F::zero();
                let mut local_nan = false;
                for i in chunk.range() {
                    let e = (F::from_f64(0.2) * k1[i] - F::from_f64(0.9) * k3[i]
                        + F::from_f64(0.8) * k4[i]
                        - F::from_f64(0.1) * k5[i])
                        .abs()
                        * chunk.eps_mult;
                    if !e.is_finite() {
                        local_nan = true;
                    } else if e > local_max {
                        local_max = e;
                    }
                }
                (local_max, local_nan)
            })
            .reduce(
                || (F::zero(), false),
                |(am, an), (bm, bn)| (if am > bm { am } else { bm }, an || bn),
            )
    }

    /// Apply the accepted-step update `x += (h/6)K1 + (2h/3)K4 + (h/6)K5`
    /// over `mem`'s chunks only (`spec.md` §4.2).
    pub(super) fn commit(&self, mem: &MemDist<F>, h: F, x: &mut Array1<F>) {
        let sixth = F::one() / F::from_f64(6.0);
        let two_thirds = F::from_f64(2.0) / F::from_f64(3.0);
        let Scratch { k1, k4, k5, .. } = &self.scratch;
        mem.for_each_index(|i| {
            x[i] = x[i] + h * sixth * k1[i] + h * two_thirds * k4[i] + h * sixth * k5[i];
        });
    }
}
