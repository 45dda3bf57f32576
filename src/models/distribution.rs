//! Duration distributions.
//!
//! A closed set of distribution laws used for both base durations and raw
//! delays. Each variant is a plain parameter record; sampling dispatches
//! on the variant and draws from an injected random source, so a given
//! seed always reproduces the same realization.
//!
//! | Variant | Parameters | Mean |
//! |---------|-----------|------|
//! | Fixed | value | value |
//! | Uniform | min, max | (min + max) / 2 |
//! | Triangular | min, mode, max | (min + mode + max) / 3 |
//! | Exponential | mean | mean |
//!
//! # Reference
//! Law (2015), "Simulation Modeling and Analysis", Ch. 6

use rand::Rng;
use rand_distr::Distribution as _;
use rand_distr::{Exp, Triangular};
use serde::{Deserialize, Serialize};

/// A duration distribution (time units: days).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    /// Degenerate distribution: always `value`.
    Fixed {
        /// The constant duration.
        value: f64,
    },
    /// Continuous uniform on `[min, max]`.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Triangular on `[min, max]` peaking at `mode`.
    Triangular {
        /// Lower bound.
        min: f64,
        /// Most likely value.
        mode: f64,
        /// Upper bound.
        max: f64,
    },
    /// Exponential with the given mean (rate = 1 / mean).
    Exponential {
        /// Expected value.
        mean: f64,
    },
}

impl Distribution {
    /// A constant duration.
    pub fn fixed(value: f64) -> Self {
        Distribution::Fixed { value }
    }

    /// Uniform on `[min, max]`.
    pub fn uniform(min: f64, max: f64) -> Self {
        Distribution::Uniform { min, max }
    }

    /// Triangular on `[min, max]` with the given mode.
    pub fn triangular(min: f64, mode: f64, max: f64) -> Self {
        Distribution::Triangular { min, mode, max }
    }

    /// Exponential with the given mean.
    pub fn exponential(mean: f64) -> Self {
        Distribution::Exponential { mean }
    }

    /// Checks that all parameters are finite, non-negative and ordered.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let params = match *self {
            Distribution::Fixed { value } => vec![value],
            Distribution::Uniform { min, max } => vec![min, max],
            Distribution::Triangular { min, mode, max } => vec![min, mode, max],
            Distribution::Exponential { mean } => vec![mean],
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err(format!("non-finite parameter in {self:?}"));
        }
        if params.iter().any(|p| *p < 0.0) {
            return Err(format!("negative parameter in {self:?}"));
        }
        match *self {
            Distribution::Uniform { min, max } if min > max => {
                Err(format!("uniform min {min} exceeds max {max}"))
            }
            Distribution::Triangular { min, mode, max } if !(min <= mode && mode <= max) => Err(
                format!("triangular requires min <= mode <= max, got ({min}, {mode}, {max})"),
            ),
            _ => Ok(()),
        }
    }

    /// Whether sampling never consumes randomness.
    pub fn is_deterministic(&self) -> bool {
        match *self {
            Distribution::Fixed { .. } => true,
            Distribution::Uniform { min, max } => min == max,
            Distribution::Triangular { min, max, .. } => min == max,
            Distribution::Exponential { mean } => mean == 0.0,
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Fixed { value } => value,
            Distribution::Uniform { min, max } => (min + max) / 2.0,
            Distribution::Triangular { min, mode, max } => (min + mode + max) / 3.0,
            Distribution::Exponential { mean } => mean,
        }
    }

    /// Draws one realization.
    ///
    /// Parameters are validated first; a malformed distribution returns the
    /// reason without touching `rng`. Degenerate parameter sets return their
    /// constant without touching `rng` either.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, String> {
        self.validate()?;
        if self.is_deterministic() {
            return Ok(self.mean());
        }
        match *self {
            Distribution::Fixed { value } => Ok(value),
            Distribution::Uniform { min, max } => Ok(rng.random_range(min..=max)),
            Distribution::Triangular { min, mode, max } => Triangular::new(min, max, mode)
                .map(|d| d.sample(rng))
                .map_err(|e| format!("triangular: {e}")),
            Distribution::Exponential { mean } => Exp::new(1.0 / mean)
                .map(|d| d.sample(rng))
                .map_err(|e| format!("exponential: {e}")),
        }
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::fixed(0.0)
    }
}
