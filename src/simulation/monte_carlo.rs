//! Monte Carlo runner.
//!
//! Repeats the schedule builder with an independent random source per
//! iteration and aggregates the run results.
//!
//! # Reproducibility
//!
//! Iteration `i` draws from `rng_factory.rng_for(i)`: a fresh generator per
//! iteration rather than one continued stream. Run results are gathered in
//! iteration order and reduced sequentially, so sequential and parallel
//! execution produce bit-identical statistics for the same factory.
//!
//! # Failure policy
//!
//! The network and parameters are validated once up front; any error
//! aborts the whole run and no partial statistics are returned.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::builder::ScheduleBuilder;
use super::delay::check_lean_factor;
use super::stats::{AggregatedStatistics, Metric, StatisticsAccumulator};
use crate::error::{Result, SimulationError};
use crate::models::{Activity, Project, RunResult};

/// Source of per-iteration random generators.
pub trait RngFactory: Sync {
    /// Generator handed to one iteration.
    type Generator: Rng;

    /// Generator for the given iteration. Must be a pure function of
    /// `iteration` for runs to be reproducible.
    fn rng_for(&self, iteration: u64) -> Self::Generator;
}

/// Derives one [`StdRng`] per iteration from a top-level seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRngFactory {
    /// Top-level seed.
    pub seed: u64,
}

impl SeededRngFactory {
    /// Creates a factory for `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn mix(&self, iteration: u64) -> u64 {
        // SplitMix64 finalizer over (seed, iteration).
        let mut z = self
            .seed
            .wrapping_add(iteration.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RngFactory for SeededRngFactory {
    type Generator = StdRng;

    fn rng_for(&self, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.mix(iteration))
    }
}

/// Outcome of a Monte Carlo run, with the per-iteration results kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    /// Lean factor the runs used.
    pub lean_factor: f64,
    /// Aggregated statistics.
    pub statistics: AggregatedStatistics,
    /// Run results in iteration order.
    pub runs: Vec<RunResult>,
}

impl MonteCarloReport {
    /// Values of one metric in iteration order.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.runs.iter().map(|r| metric.of(r)).collect()
    }

    /// Nearest-rank percentile of a metric.
    ///
    /// `p` is in percent (0..=100); `p = 0` yields the minimum. Returns `None`
    /// for an out-of-range `p` or an empty report.
    pub fn percentile(&self, metric: Metric, p: f64) -> Option<f64> {
        if self.runs.is_empty() || !(0.0..=100.0).contains(&p) {
            return None;
        }
        let mut values = self.values(metric);
        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len();
        let rank = ((p / 100.0) * n as f64).ceil() as usize;
        Some(values[rank.clamp(1, n) - 1])
    }
}

/// Repeats schedule realization and aggregates the outcomes.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloRunner {
    builder: ScheduleBuilder,
    parallel: bool,
}

impl MonteCarloRunner {
    /// Creates a sequential runner with a default builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schedule builder.
    pub fn with_builder(mut self, builder: ScheduleBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Runs iterations on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The schedule builder.
    pub fn builder(&self) -> &ScheduleBuilder {
        &self.builder
    }

    /// Whether iterations run in parallel.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Runs `iterations` simulations and returns the aggregated statistics.
    ///
    /// # Errors
    /// `InvalidParameter` for a zero iteration count or a Lean factor outside
    /// [0, 1]; any structural error of the activity set.
    pub fn run<F: RngFactory>(
        &self,
        activities: &[Activity],
        lean_factor: f64,
        iterations: usize,
        rng_factory: &F,
    ) -> Result<AggregatedStatistics> {
        check_iterations(iterations)?;
        check_lean_factor(lean_factor)?;
        let project = Project::new(activities.to_vec())?;

        if self.parallel {
            return Ok(self
                .run_project(&project, lean_factor, iterations, rng_factory)?
                .statistics);
        }

        let mut acc = StatisticsAccumulator::new();
        for i in 0..iterations as u64 {
            acc.push(&self.iterate(&project, lean_factor, rng_factory, i)?);
        }
        let stats = acc.finish();
        log_completion(lean_factor, &stats);
        Ok(stats)
    }

    /// Like [`run`](Self::run), keeping every run result.
    pub fn run_with_samples<F: RngFactory>(
        &self,
        activities: &[Activity],
        lean_factor: f64,
        iterations: usize,
        rng_factory: &F,
    ) -> Result<MonteCarloReport> {
        check_iterations(iterations)?;
        check_lean_factor(lean_factor)?;
        let project = Project::new(activities.to_vec())?;
        self.run_project(&project, lean_factor, iterations, rng_factory)
    }

    /// Runs an already validated project, keeping every run result.
    pub fn run_project<F: RngFactory>(
        &self,
        project: &Project,
        lean_factor: f64,
        iterations: usize,
        rng_factory: &F,
    ) -> Result<MonteCarloReport> {
        check_iterations(iterations)?;
        check_lean_factor(lean_factor)?;

        let runs: Vec<RunResult> = if self.parallel {
            debug!("running {iterations} iterations on {} threads", rayon::current_num_threads());
            (0..iterations)
                .into_par_iter()
                .map(|i| self.iterate(project, lean_factor, rng_factory, i as u64))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..iterations as u64)
                .map(|i| self.iterate(project, lean_factor, rng_factory, i))
                .collect::<Result<Vec<_>>>()?
        };

        let statistics = AggregatedStatistics::from_runs(&runs);
        log_completion(lean_factor, &statistics);
        Ok(MonteCarloReport {
            lean_factor,
            statistics,
            runs,
        })
    }

    fn iterate<F: RngFactory>(
        &self,
        project: &Project,
        lean_factor: f64,
        rng_factory: &F,
        iteration: u64,
    ) -> Result<RunResult> {
        let mut rng = rng_factory.rng_for(iteration);
        let schedule = self.builder.build_project(project, lean_factor, &mut rng)?;
        Ok(schedule.run_result())
    }
}

fn check_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(SimulationError::InvalidParameter(
            "iteration count must be positive".into(),
        ));
    }
    Ok(())
}

fn log_completion(lean_factor: f64, stats: &AggregatedStatistics) {
    info!(
        "monte carlo done: iterations={} lean={:.2} mean_duration={:.3} mean_efficiency={:.4}",
        stats.iterations, lean_factor, stats.duration.mean, stats.efficiency.mean
    );
}
