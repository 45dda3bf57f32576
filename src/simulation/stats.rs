//! Monte Carlo outcome statistics.
//!
//! Summarizes a sequence of [`RunResult`]s per tracked metric.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Duration | Latest finish minus project start |
//! | Efficiency | Value-adding time / duration |
//! | Value-adding time | Realized value-adding work |
//! | Total delay | Lean-scaled delay summed over activities |
//!
//! Each metric keeps count, mean, min, max and sample standard deviation.
//! Accumulation uses Welford's algorithm; partial accumulators merge with
//! Chan's parallel update, which is commutative and associative up to
//! floating-point rounding.
//!
//! # Reference
//! Welford (1962), "Note on a Method for Calculating Corrected Sums of Squares"
//! Chan, Golub & LeVeque (1979), "Updating Formulae and a Pairwise Algorithm"

use serde::{Deserialize, Serialize};

use crate::models::RunResult;

/// Streaming accumulator for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl SummaryAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Adds one observation.
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Combines two partial accumulators.
    pub fn merge(&self, other: &Self) -> Self {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let count = self.count + other.count;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = count as f64;
        let delta = other.mean - self.mean;
        Self {
            count,
            mean: (n_a * self.mean + n_b * other.mean) / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Number of observations.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Freezes the accumulator into a summary.
    pub fn summary(&self) -> MetricSummary {
        if self.count == 0 {
            return MetricSummary::default();
        }
        let std_dev = if self.count > 1 {
            (self.m2 / (self.count - 1) as f64).max(0.0).sqrt()
        } else {
            0.0
        };
        MetricSummary {
            count: self.count,
            mean: self.mean,
            min: self.min,
            max: self.max,
            std_dev,
        }
    }
}

impl Default for SummaryAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for SummaryAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.push(x);
        }
        acc
    }
}

/// Distribution summary of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of observations.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// Sample standard deviation (n - 1). Zero for fewer than two observations.
    pub std_dev: f64,
}

impl MetricSummary {
    /// Range (max - min).
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }

    /// Coefficient of variation (std_dev / mean). `None` if the mean is zero.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean == 0.0 {
            None
        } else {
            Some(self.std_dev / self.mean)
        }
    }
}

/// Metrics tracked across Monte Carlo iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Project duration.
    Duration,
    /// Efficiency ratio.
    Efficiency,
    /// Value-adding time.
    ValueAddingTime,
    /// Total applied delay.
    TotalDelay,
}

impl Metric {
    /// All tracked metrics.
    pub const ALL: [Metric; 4] = [
        Metric::Duration,
        Metric::Efficiency,
        Metric::ValueAddingTime,
        Metric::TotalDelay,
    ];

    /// Extracts this metric from a run.
    pub fn of(self, run: &RunResult) -> f64 {
        match self {
            Metric::Duration => run.project_duration,
            Metric::Efficiency => run.efficiency,
            Metric::ValueAddingTime => run.value_adding_time,
            Metric::TotalDelay => run.total_delay,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Duration => "duration",
            Metric::Efficiency => "efficiency",
            Metric::ValueAddingTime => "value-adding time",
            Metric::TotalDelay => "total delay",
        }
    }
}

/// Accumulates run results metric by metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatisticsAccumulator {
    duration: SummaryAccumulator,
    efficiency: SummaryAccumulator,
    value_adding_time: SummaryAccumulator,
    total_delay: SummaryAccumulator,
}

impl StatisticsAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one run.
    pub fn push(&mut self, run: &RunResult) {
        self.duration.push(run.project_duration);
        self.efficiency.push(run.efficiency);
        self.value_adding_time.push(run.value_adding_time);
        self.total_delay.push(run.total_delay);
    }

    /// Combines two partial accumulators.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            duration: self.duration.merge(&other.duration),
            efficiency: self.efficiency.merge(&other.efficiency),
            value_adding_time: self.value_adding_time.merge(&other.value_adding_time),
            total_delay: self.total_delay.merge(&other.total_delay),
        }
    }

    /// Freezes into aggregated statistics.
    pub fn finish(&self) -> AggregatedStatistics {
        AggregatedStatistics {
            iterations: self.duration.count(),
            duration: self.duration.summary(),
            efficiency: self.efficiency.summary(),
            value_adding_time: self.value_adding_time.summary(),
            total_delay: self.total_delay.summary(),
        }
    }
}

/// Statistics over a completed Monte Carlo run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStatistics {
    /// Number of iterations aggregated.
    pub iterations: u64,
    /// Project duration summary (days).
    pub duration: MetricSummary,
    /// Efficiency summary.
    pub efficiency: MetricSummary,
    /// Value-adding time summary (days).
    pub value_adding_time: MetricSummary,
    /// Total delay summary (days).
    pub total_delay: MetricSummary,
}

impl AggregatedStatistics {
    /// Aggregates a sequence of runs in order.
    pub fn from_runs<'a, I>(runs: I) -> Self
    where
        I: IntoIterator<Item = &'a RunResult>,
    {
        let mut acc = StatisticsAccumulator::new();
        for run in runs {
            acc.push(run);
        }
        acc.finish()
    }

    /// Summary for a given metric.
    pub fn metric(&self, metric: Metric) -> &MetricSummary {
        match metric {
            Metric::Duration => &self.duration,
            Metric::Efficiency => &self.efficiency,
            Metric::ValueAddingTime => &self.value_adding_time,
            Metric::TotalDelay => &self.total_delay,
        }
    }

    /// Mean value-adding time over mean duration.
    ///
    /// Ratio of means rather than mean of ratios; 0 when the mean duration is 0.
    pub fn pooled_efficiency(&self) -> f64 {
        if self.duration.mean > 0.0 {
            self.value_adding_time.mean / self.duration.mean
        } else {
            0.0
        }
    }
}
