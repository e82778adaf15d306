//! The model-owned deterministic random source.
//!
//! # Determinism strategy
//!
//! There is exactly one `SimRng`, owned by the `Model`, seeded once at
//! construction. Every stochastic draw in the simulation — jitter sampling,
//! Burr-distributed dwell times — goes through it by `&mut` reference. There
//! is no per-component or per-agent RNG state, so a run is fully reproducible
//! from its seed regardless of which components or trains happen to sample
//! first, as long as the event order itself is deterministic (which the
//! scheduler guarantees).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant, used when a caller wants to
/// derive a reproducible child seed (e.g. for a component's own sub-stream)
/// without disturbing the parent stream's next draw.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The simulation's single random source.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child seed deterministically from this stream and a caller
    /// supplied discriminant (e.g. a component id), without consuming it as
    /// randomness proper — intended for one-off situations where a single
    /// shared stream is awkward (none of the core components currently need
    /// this; it exists for embedding applications).
    pub fn child_seed(&mut self, discriminant: u64) -> u64 {
        self.0.r#gen::<u64>() ^ discriminant.wrapping_mul(MIXING_CONSTANT)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform draw in `[0, 1)`, the building block for inverse-CDF sampling.
    #[inline]
    pub fn uniform01(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
