//! Lean-scaled delay model.
//!
//! Non-value-adding activities draw a raw delay from their own
//! [`DelaySpec`] (or the model's fallback) and the Lean improvement factor
//! scales it: `applied = raw * (1 - lean)`. Value-adding activities are
//! never delayed.
//!
//! The raw draw happens before scaling and regardless of the factor, so for
//! a fixed random stream the applied delay is non-increasing in `lean` and
//! exactly zero at `lean = 1`.

use rand::Rng;

use crate::error::{Result, SimulationError};
use crate::models::{Activity, DelaySpec};

/// Checks that a Lean factor lies in [0, 1].
pub fn check_lean_factor(lean_factor: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&lean_factor) {
        Ok(lean_factor)
    } else {
        Err(SimulationError::InvalidParameter(format!(
            "lean factor {lean_factor} outside [0, 1]"
        )))
    }
}

/// Produces delay samples for activities.
#[derive(Debug, Clone, Default)]
pub struct DelayModel {
    fallback: DelaySpec,
}

impl DelayModel {
    /// Creates a model with no fallback delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay law used by non-value-adding activities without their own.
    pub fn with_fallback(mut self, fallback: DelaySpec) -> Self {
        self.fallback = fallback;
        self
    }

    /// The fallback delay law.
    pub fn fallback(&self) -> &DelaySpec {
        &self.fallback
    }

    /// Delay law applied to `activity`, or `None` for value-adding work.
    pub fn spec_for<'a>(&'a self, activity: &'a Activity) -> Option<&'a DelaySpec> {
        if activity.is_value_adding() {
            None
        } else {
            Some(activity.delay.as_ref().unwrap_or(&self.fallback))
        }
    }

    /// Draws the Lean-scaled delay for `activity`.
    ///
    /// # Errors
    /// `InvalidParameter` if `lean_factor` is outside [0, 1]; `InvalidActivity`
    /// if the applicable delay law is malformed. Both are checked before any
    /// randomness is consumed.
    pub fn delay<R: Rng + ?Sized>(
        &self,
        activity: &Activity,
        lean_factor: f64,
        rng: &mut R,
    ) -> Result<f64> {
        let lean = check_lean_factor(lean_factor)?;
        Ok(match self.spec_for(activity) {
            Some(spec) => {
                let raw = spec
                    .sample_raw(rng)
                    .map_err(|reason| SimulationError::invalid_activity(&activity.id, reason))?;
                Self::scale(raw, lean)
            }
            None => 0.0,
        })
    }

    /// Applies the Lean factor to a raw delay.
    #[inline]
    pub fn scale(raw_delay: f64, lean_factor: f64) -> f64 {
        (raw_delay * (1.0 - lean_factor)).max(0.0)
    }
}
