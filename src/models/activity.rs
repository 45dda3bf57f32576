//! Activity model.
//!
//! An activity is the smallest schedulable unit of work in a construction
//! project. It has a stochastic base duration, a classification as
//! value-adding or not, and finish-to-start predecessors.
//!
//! # Value Classification
//!
//! - **Value-adding**: planning, execution, inspection. Never delayed.
//! - **Non-value-adding**: permitting, mobilization. Subject to stochastic
//!   delay scaled down by the Lean improvement factor.
//!
//! # Reference
//! Koskela (1992), "Application of the New Production Philosophy to Construction"

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Distribution;
use crate::error::{Result, SimulationError};

/// Whether an activity contributes directly to the deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Work that adds value (planning, execution, inspection).
    ValueAdding,
    /// Overhead or waste-prone work (permitting, mobilization).
    NonValueAdding,
}

impl ActivityKind {
    /// Whether this kind is value-adding.
    #[inline]
    pub fn is_value_adding(self) -> bool {
        self == ActivityKind::ValueAdding
    }
}

/// Stochastic delay law for a non-value-adding activity.
///
/// With probability `probability` a raw delay is drawn from `distribution`;
/// otherwise the raw delay is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySpec {
    /// Raw delay distribution (before Lean scaling).
    pub distribution: Distribution,
    /// Chance that a delay occurs at all (0.0..=1.0).
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

impl DelaySpec {
    /// A delay that always occurs.
    pub fn always(distribution: Distribution) -> Self {
        Self {
            distribution,
            probability: 1.0,
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::always(Distribution::fixed(0.0))
    }

    /// Sets the occurrence probability.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Checks the distribution and that the probability lies in [0, 1].
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(format!(
                "delay probability {} outside [0, 1]",
                self.probability
            ));
        }
        self.distribution
            .validate()
            .map_err(|reason| format!("delay {reason}"))
    }

    /// Draws a raw (unscaled) delay.
    ///
    /// Validates first, so a malformed law fails before any draw.
    pub fn sample_raw<R: Rng + ?Sized>(&self, rng: &mut R) -> std::result::Result<f64, String> {
        self.validate()?;
        let occurs = self.probability >= 1.0 || rng.random_bool(self.probability);
        if occurs {
            self.distribution.sample(rng)
        } else {
            Ok(0.0)
        }
    }
}

impl Default for DelaySpec {
    fn default() -> Self {
        Self::none()
    }
}

/// An activity to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier, stable across runs.
    pub id: String,
    /// Human-readable label.
    #[serde(default)]
    pub name: String,
    /// Value classification.
    pub kind: ActivityKind,
    /// Base duration law (days).
    pub duration: Distribution,
    /// IDs of activities that must finish before this one starts.
    #[serde(default)]
    pub predecessors: Vec<String>,
    /// Activity-specific delay law. `None` falls back to the delay model default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelaySpec>,
}

impl Activity {
    /// Creates a new activity with zero duration and no predecessors.
    pub fn new(id: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            duration: Distribution::default(),
            predecessors: Vec::new(),
            delay: None,
        }
    }

    /// Creates a value-adding activity.
    pub fn value_adding(id: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::ValueAdding)
    }

    /// Creates a non-value-adding activity.
    pub fn non_value_adding(id: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::NonValueAdding)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the base duration law.
    pub fn with_duration(mut self, duration: Distribution) -> Self {
        self.duration = duration;
        self
    }

    /// Sets a fixed base duration.
    pub fn with_fixed_duration(mut self, days: f64) -> Self {
        self.duration = Distribution::fixed(days);
        self
    }

    /// Adds a predecessor activity ID.
    pub fn with_predecessor(mut self, predecessor_id: impl Into<String>) -> Self {
        self.predecessors.push(predecessor_id.into());
        self
    }

    /// Sets the activity-specific delay law.
    pub fn with_delay(mut self, delay: DelaySpec) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Display label: the name, or the ID when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether the activity is value-adding.
    #[inline]
    pub fn is_value_adding(&self) -> bool {
        self.kind.is_value_adding()
    }

    /// Validates the activity in isolation.
    ///
    /// Checks the duration and delay parameters, a non-empty ID, and that the
    /// activity is not its own predecessor.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(SimulationError::invalid_activity(
                &self.id,
                "activity ID must not be empty",
            ));
        }
        self.duration
            .validate()
            .map_err(|reason| SimulationError::invalid_activity(&self.id, reason))?;
        if let Some(delay) = &self.delay {
            delay
                .validate()
                .map_err(|reason| SimulationError::invalid_activity(&self.id, reason))?;
        }
        if self.predecessors.iter().any(|p| *p == self.id) {
            return Err(SimulationError::invalid_activity(
                &self.id,
                "activity lists itself as a predecessor",
            ));
        }
        Ok(())
    }

    /// Draws one base duration realization.
    ///
    /// # Errors
    /// `InvalidActivity` if the duration law is malformed; `rng` is untouched.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        self.duration
            .sample(rng)
            .map_err(|reason| SimulationError::invalid_activity(&self.id, reason))
    }
}
