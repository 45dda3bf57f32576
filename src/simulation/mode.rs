//! Simulation mode selection.
//!
//! Both modes share one [`ScheduleBuilder`]: `Detailed` realizes a single
//! schedule, `MonteCarlo` wraps the builder in a [`MonteCarloRunner`].
//! The detailed run draws from the same generator as Monte Carlo
//! iteration 0, so for a given seed it is the first sample of the
//! Monte Carlo distribution.

use log::debug;
use serde::{Deserialize, Serialize};

use super::builder::ScheduleBuilder;
use super::delay::check_lean_factor;
use super::monte_carlo::{MonteCarloReport, MonteCarloRunner, RngFactory, SeededRngFactory};
use crate::error::Result;
use crate::models::{Activity, Project, Schedule};

/// Which kind of run to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationMode {
    /// One realized schedule.
    Detailed,
    /// Repeated runs aggregated into statistics.
    MonteCarlo {
        /// Number of iterations (positive).
        iterations: usize,
    },
}

impl Default for SimulationMode {
    fn default() -> Self {
        SimulationMode::MonteCarlo { iterations: 1000 }
    }
}

/// Result of [`Simulation::execute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SimulationOutput {
    /// A single realized schedule.
    Detailed(Schedule),
    /// Monte Carlo statistics with per-iteration results.
    MonteCarlo(MonteCarloReport),
}

/// A validated project bound to run parameters.
#[derive(Debug, Clone)]
pub struct Simulation {
    project: Project,
    builder: ScheduleBuilder,
    lean_factor: f64,
    seed: u64,
    parallel: bool,
}

impl Simulation {
    /// Validates the activities and Lean factor.
    pub fn new(activities: Vec<Activity>, lean_factor: f64) -> Result<Self> {
        check_lean_factor(lean_factor)?;
        Ok(Self {
            project: Project::new(activities)?,
            builder: ScheduleBuilder::new(),
            lean_factor,
            seed: 0,
            parallel: false,
        })
    }

    /// Sets the top-level seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the schedule builder.
    pub fn with_builder(mut self, builder: ScheduleBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Enables parallel Monte Carlo iterations.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The validated project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The Lean factor.
    pub fn lean_factor(&self) -> f64 {
        self.lean_factor
    }

    /// The top-level seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Realizes one schedule.
    pub fn detailed(&self) -> Result<Schedule> {
        let mut rng = SeededRngFactory::new(self.seed).rng_for(0);
        self.builder
            .build_project(&self.project, self.lean_factor, &mut rng)
    }

    /// Runs `iterations` Monte Carlo simulations.
    pub fn monte_carlo(&self, iterations: usize) -> Result<MonteCarloReport> {
        MonteCarloRunner::new()
            .with_builder(self.builder.clone())
            .with_parallel(self.parallel)
            .run_project(
                &self.project,
                self.lean_factor,
                iterations,
                &SeededRngFactory::new(self.seed),
            )
    }

    /// Runs the requested mode.
    pub fn execute(&self, mode: SimulationMode) -> Result<SimulationOutput> {
        debug!(
            "executing {mode:?} on {} activities (lean={}, seed={})",
            self.project.len(),
            self.lean_factor,
            self.seed
        );
        match mode {
            SimulationMode::Detailed => self.detailed().map(SimulationOutput::Detailed),
            SimulationMode::MonteCarlo { iterations } => {
                self.monte_carlo(iterations).map(SimulationOutput::MonteCarlo)
            }
        }
    }
}
