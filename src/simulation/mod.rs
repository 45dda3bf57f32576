//! Simulation engine.
//!
//! Realizes project schedules under stochastic non-value-adding delay and
//! aggregates repeated runs.
//!
//! # Components
//!
//! - `DelayModel`: Lean-scaled delay for non-value-adding activities
//! - `ScheduleBuilder`: forward pass producing one realized `Schedule`
//! - `MonteCarloRunner`: repeated runs with per-iteration random sources
//! - `AggregatedStatistics`: mean/min/max/std-dev per tracked metric
//! - `Simulation`: mode selector shared by detailed and Monte Carlo runs
//!
//! # References
//!
//! - Law (2015), "Simulation Modeling and Analysis"
//! - Koskela (1992), "Application of the New Production Philosophy to Construction"

mod builder;
mod delay;
mod mode;
mod monte_carlo;
mod stats;

pub use builder::ScheduleBuilder;
pub use delay::{check_lean_factor, DelayModel};
pub use mode::{Simulation, SimulationMode, SimulationOutput};
pub use monte_carlo::{MonteCarloReport, MonteCarloRunner, RngFactory, SeededRngFactory};
pub use stats::{
    AggregatedStatistics, Metric, MetricSummary, StatisticsAccumulator, SummaryAccumulator,
};
