//! Realized schedule model.
//!
//! A schedule is the outcome of one simulation run: a start and finish for
//! every activity plus the project-level duration and efficiency. It is
//! created in one piece and never mutated afterwards.
//!
//! # Efficiency
//!
//! `efficiency = value-adding time / project duration`, where value-adding
//! time sums the realized durations of value-adding activities. A project
//! of zero length has efficiency 0 by definition. Parallel value-adding
//! work can push the ratio above 1.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{Activity, ActivityKind};

/// One activity as realized in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedActivity {
    /// Activity ID.
    pub activity_id: String,
    /// Display label.
    pub name: String,
    /// Value classification.
    pub kind: ActivityKind,
    /// Start time (days).
    pub start: f64,
    /// Finish time (days). Always `start + duration`.
    pub finish: f64,
    /// Sampled base duration (days).
    pub base_duration: f64,
    /// Lean-scaled delay (days). Zero for value-adding activities.
    pub applied_delay: f64,
    /// `base_duration + applied_delay` (days).
    pub duration: f64,
}

impl RealizedActivity {
    /// Realizes `activity` starting at `start`.
    pub fn new(activity: &Activity, start: f64, base_duration: f64, applied_delay: f64) -> Self {
        let duration = base_duration + applied_delay;
        Self {
            activity_id: activity.id.clone(),
            name: activity.label().to_string(),
            kind: activity.kind,
            start,
            finish: start + duration,
            base_duration,
            applied_delay,
            duration,
        }
    }

    /// Whether the activity is value-adding.
    #[inline]
    pub fn is_value_adding(&self) -> bool {
        self.kind.is_value_adding()
    }
}

/// A complete realized schedule for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    start_time: f64,
    activities: Vec<RealizedActivity>,
    project_duration: f64,
    efficiency: f64,
}

/// Scalar summary of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Latest finish minus project start (days).
    pub project_duration: f64,
    /// Value-adding time over project duration.
    pub efficiency: f64,
    /// Realized duration summed over value-adding activities (days).
    pub value_adding_time: f64,
    /// Realized duration summed over non-value-adding activities (days).
    pub non_value_adding_time: f64,
    /// Applied delay summed over all activities (days).
    pub total_delay: f64,
}

impl Schedule {
    /// Builds a schedule from realized activities and derives its metrics.
    pub fn new(start_time: f64, activities: Vec<RealizedActivity>) -> Self {
        let finish = activities
            .iter()
            .map(|a| a.finish)
            .fold(start_time, f64::max);
        let project_duration = finish - start_time;
        let value_adding: f64 = activities
            .iter()
            .filter(|a| a.is_value_adding())
            .map(|a| a.duration)
            .sum();
        let efficiency = if project_duration > 0.0 {
            value_adding / project_duration
        } else {
            if !activities.is_empty() {
                warn!("project duration is zero; efficiency reported as 0");
            }
            0.0
        };
        Self {
            start_time,
            activities,
            project_duration,
            efficiency,
        }
    }

    /// Realized activities in processing order.
    pub fn activities(&self) -> &[RealizedActivity] {
        &self.activities
    }

    /// Project start time (days).
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Latest finish across all activities (days).
    pub fn finish_time(&self) -> f64 {
        self.start_time + self.project_duration
    }

    /// Project duration: latest finish minus start (days).
    pub fn project_duration(&self) -> f64 {
        self.project_duration
    }

    /// Value-adding time over project duration.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Finds the realization of a given activity.
    pub fn realized(&self, activity_id: &str) -> Option<&RealizedActivity> {
        self.activities
            .iter()
            .find(|a| a.activity_id == activity_id)
    }

    /// Sum of realized value-adding durations (days).
    pub fn value_adding_time(&self) -> f64 {
        self.time_for(ActivityKind::ValueAdding)
    }

    /// Sum of realized non-value-adding durations (days).
    pub fn non_value_adding_time(&self) -> f64 {
        self.time_for(ActivityKind::NonValueAdding)
    }

    /// Sum of applied delays (days).
    pub fn total_delay(&self) -> f64 {
        self.activities.iter().map(|a| a.applied_delay).sum()
    }

    /// Number of realized activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the schedule has no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Reduces the schedule to its scalar summary.
    pub fn run_result(&self) -> RunResult {
        RunResult {
            project_duration: self.project_duration,
            efficiency: self.efficiency,
            value_adding_time: self.value_adding_time(),
            non_value_adding_time: self.non_value_adding_time(),
            total_delay: self.total_delay(),
        }
    }

    fn time_for(&self, kind: ActivityKind) -> f64 {
        self.activities
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.duration)
            .sum()
    }
}
