//! Jitter strategies: stochastic perturbations added to otherwise
//! deterministic component dwell/traversal durations.
//!
//! Every variant draws from the `SimRng` passed to it rather than owning its
//! own random source, so that a run is reproducible from the Model's single
//! seed regardless of how many components sample jitter.

use railsim_core::{RailError, RailResult, SimRng};

#[cfg(test)]
mod tests;

/// A stochastic perturbation strategy.
///
/// `sample` returns a floating-point offset; callers add it to a base
/// duration and round as appropriate for their component (most components
/// round after adding; `MultiBlockTrack` divides by its block count first).
pub trait Jitter: std::fmt::Debug {
    fn sample(&self, rng: &mut SimRng) -> f64;
}

/// No perturbation. `jitter()` always returns `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self, _rng: &mut SimRng) -> f64 {
        0.0
    }
}

/// Uniform integer jitter in `[min, max]` inclusive.
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    min: i64,
    max: i64,
}

impl UniformJitter {
    pub fn new(min: i64, max: i64) -> RailResult<Self> {
        if min > max {
            return Err(RailError::InputMismatch(format!(
                "UniformJitter min ({min}) must not exceed max ({max})"
            )));
        }
        Ok(Self { min, max })
    }
}

impl Jitter for UniformJitter {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        rng.gen_range(self.min..=self.max) as f64
    }
}

/// Gaussian (normal) jitter with the given mean and standard deviation.
///
/// Not present in the reference implementation; added here because the
/// jitter strategy is an open, extensible capability (see the `Jitter`
/// trait) and a normal perturbation is the natural complement to
/// `UniformJitter` for modeling symmetric scheduling noise.
#[derive(Debug, Clone, Copy)]
pub struct GaussianJitter {
    mean: f64,
    std_dev: f64,
}

impl GaussianJitter {
    pub fn new(mean: f64, std_dev: f64) -> RailResult<Self> {
        if std_dev <= 0.0 {
            return Err(RailError::not_positive("std_dev", std_dev));
        }
        Ok(Self { mean, std_dev })
    }
}

impl Jitter for GaussianJitter {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        use rand_distr::{Distribution, Normal};
        let dist = Normal::new(self.mean, self.std_dev).expect("std_dev validated positive");
        dist.sample(rng.inner())
    }
}

/// Log-normal jitter: `exp(Normal(mu, sigma))`, for perturbations that
/// should never go negative but can occasionally spike large.
#[derive(Debug, Clone, Copy)]
pub struct LognormalJitter {
    mu: f64,
    sigma: f64,
}

impl LognormalJitter {
    pub fn new(mu: f64, sigma: f64) -> RailResult<Self> {
        if sigma <= 0.0 {
            return Err(RailError::not_positive("sigma", sigma));
        }
        Ok(Self { mu, sigma })
    }
}

impl Jitter for LognormalJitter {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        use rand_distr::{Distribution, LogNormal};
        let dist = LogNormal::new(self.mu, self.sigma).expect("sigma validated positive");
        dist.sample(rng.inner())
    }
}

/// Disruption jitter: with probability `probability`, adds a fixed
/// `extra_delay`; otherwise contributes nothing. Models infrequent,
/// large service disruptions rather than continuous scheduling noise.
#[derive(Debug, Clone, Copy)]
pub struct DisruptionJitter {
    probability: f64,
    extra_delay: f64,
}

impl DisruptionJitter {
    pub fn new(probability: f64, extra_delay: f64) -> RailResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(RailError::not_a_probability("probability", probability));
        }
        Ok(Self {
            probability,
            extra_delay,
        })
    }
}

impl Jitter for DisruptionJitter {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        if rng.gen_bool(self.probability) {
            self.extra_delay
        } else {
            0.0
        }
    }
}
