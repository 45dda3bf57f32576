//! Run configuration.
//!
//! A `SimulationConfig` bundles the activity network and run parameters
//! and is read from JSON. An absent `activities` list selects the
//! built-in reference construction project.
//!
//! ```json
//! {
//!   "lean_factor": 0.5,
//!   "seed": 42,
//!   "mode": { "type": "monte_carlo", "iterations": 1000 },
//!   "activities": [
//!     { "id": "plan", "kind": "value_adding",
//!       "duration": { "type": "fixed", "value": 5.0 } }
//!   ]
//! }
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::models::{reference, Activity, DelaySpec};
use crate::simulation::{
    check_lean_factor, DelayModel, ScheduleBuilder, Simulation, SimulationMode,
};

/// Complete description of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Lean improvement factor in [0, 1].
    pub lean_factor: f64,
    /// Detailed or Monte Carlo.
    pub mode: SimulationMode,
    /// Top-level random seed.
    pub seed: u64,
    /// Run Monte Carlo iterations in parallel.
    pub parallel: bool,
    /// Project start time (days).
    pub start_time: f64,
    /// Delay law for non-value-adding activities without their own.
    pub default_delay: Option<DelaySpec>,
    /// Activity network. `None` selects the reference project.
    pub activities: Option<Vec<Activity>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lean_factor: 0.0,
            mode: SimulationMode::default(),
            seed: 0,
            parallel: false,
            start_time: 0.0,
            default_delay: None,
            activities: None,
        }
    }
}

impl SimulationConfig {
    /// Parses a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The configured activities, or the reference project.
    pub fn resolved_activities(&self) -> Vec<Activity> {
        self.activities
            .clone()
            .unwrap_or_else(reference::construction_project)
    }

    /// Schedule builder matching this configuration.
    pub fn builder(&self) -> ScheduleBuilder {
        let mut delay_model = DelayModel::new();
        if let Some(fallback) = self.default_delay {
            delay_model = delay_model.with_fallback(fallback);
        }
        ScheduleBuilder::new()
            .with_delay_model(delay_model)
            .with_start_time(self.start_time)
    }

    /// Checks parameters and the activity network without running anything.
    pub fn validate(&self) -> Result<()> {
        self.simulation().map(|_| ())
    }

    /// Builds the validated simulation described by this configuration.
    pub fn simulation(&self) -> Result<Simulation> {
        check_lean_factor(self.lean_factor)?;
        if let SimulationMode::MonteCarlo { iterations: 0 } = self.mode {
            return Err(SimulationError::InvalidParameter(
                "iteration count must be positive".into(),
            ));
        }
        if !self.start_time.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "start time {} is not finite",
                self.start_time
            )));
        }
        if let Some(delay) = &self.default_delay {
            delay
                .validate()
                .map_err(SimulationError::InvalidParameter)?;
        }
        Ok(Simulation::new(self.resolved_activities(), self.lean_factor)?
            .with_builder(self.builder())
            .with_seed(self.seed)
            .with_parallel(self.parallel))
    }
}
