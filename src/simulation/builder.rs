//! Schedule builder: one realized run of a project network.
//!
//! # Algorithm
//!
//! 1. Validate the Lean factor and the network (before any sampling).
//! 2. Visit activities in topological order.
//! 3. `start = max(finish of predecessors)`, or the project start.
//! 4. Sample the base duration, then the Lean-scaled delay.
//! 5. `finish = start + base + delay`.
//!
//! Precedence is finish-to-start with AND-join semantics: an activity
//! waits for the latest of its predecessors. There is no resource
//! contention, so any topological order yields the same schedule.
//!
//! # Complexity
//! O(n + e) where n = activities, e = precedence edges.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling" (forward pass)

use log::debug;
use rand::Rng;

use super::delay::{check_lean_factor, DelayModel};
use crate::error::Result;
use crate::models::{Activity, Project, RealizedActivity, Schedule};

/// Realizes project schedules.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_leansim::models::{Activity, DelaySpec, Distribution};
/// use u_leansim::simulation::ScheduleBuilder;
///
/// let activities = vec![
///     Activity::value_adding("plan").with_fixed_duration(5.0),
///     Activity::non_value_adding("permit")
///         .with_fixed_duration(2.0)
///         .with_delay(DelaySpec::always(Distribution::fixed(10.0)))
///         .with_predecessor("plan"),
/// ];
/// let mut rng = StdRng::seed_from_u64(42);
/// let schedule = ScheduleBuilder::new().build(&activities, 0.5, &mut rng).unwrap();
/// assert_eq!(schedule.project_duration(), 12.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    delay_model: DelayModel,
    start_time: f64,
}

impl ScheduleBuilder {
    /// Creates a builder starting at t = 0 with the default delay model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay model.
    pub fn with_delay_model(mut self, delay_model: DelayModel) -> Self {
        self.delay_model = delay_model;
        self
    }

    /// Sets the project start time (days).
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// The delay model in use.
    pub fn delay_model(&self) -> &DelayModel {
        &self.delay_model
    }

    /// Project start time (days).
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Validates `activities` and realizes one schedule.
    ///
    /// # Errors
    /// `InvalidParameter`, `InvalidActivity`, `DuplicateActivity`,
    /// `UnknownPredecessor` or `CyclicDependency`. All are raised before
    /// `rng` is touched.
    pub fn build<R: Rng + ?Sized>(
        &self,
        activities: &[Activity],
        lean_factor: f64,
        rng: &mut R,
    ) -> Result<Schedule> {
        check_lean_factor(lean_factor)?;
        let project = Project::new(activities.to_vec())?;
        self.build_project(&project, lean_factor, rng)
    }

    /// Realizes one schedule of an already validated project.
    pub fn build_project<R: Rng + ?Sized>(
        &self,
        project: &Project,
        lean_factor: f64,
        rng: &mut R,
    ) -> Result<Schedule> {
        check_lean_factor(lean_factor)?;

        let mut finish: Vec<Option<f64>> = vec![None; project.len()];
        let mut realized = Vec::with_capacity(project.len());

        for (idx, activity) in project.iter_in_order() {
            let start = project
                .predecessor_indices(idx)
                .filter_map(|p| finish[p])
                .fold(self.start_time, f64::max);

            let base = activity.sample(rng)?;
            let delay = self.delay_model.delay(activity, lean_factor, rng)?;
            let r = RealizedActivity::new(activity, start, base, delay);
            finish[idx] = Some(r.finish);
            realized.push(r);
        }

        let schedule = Schedule::new(self.start_time, realized);
        debug!(
            "realized {} activities: duration={:.3} efficiency={:.4}",
            schedule.len(),
            schedule.project_duration(),
            schedule.efficiency()
        );
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::models::{reference, DelaySpec, Distribution};
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn plan_permit_build() -> Vec<Activity> {
        vec![
            Activity::value_adding("Plan").with_fixed_duration(5.0),
            Activity::non_value_adding("Permit")
                .with_fixed_duration(2.0)
                .with_delay(DelaySpec::always(Distribution::fixed(10.0)))
                .with_predecessor("Plan"),
            Activity::value_adding("Build")
                .with_fixed_duration(8.0)
                .with_predecessor("Permit"),
        ]
    }

    /// Counts how many words the wrapped generator has handed out.
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }
        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dst)
        }
    }

    #[test]
    fn test_scenario_no_lean_improvement() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = ScheduleBuilder::new()
            .build(&plan_permit_build(), 0.0, &mut rng)
            .unwrap();

        let plan = s.realized("Plan").unwrap();
        assert_eq!((plan.start, plan.finish), (0.0, 5.0));
        let permit = s.realized("Permit").unwrap();
        assert_eq!(permit.start, 5.0);
        assert_eq!(permit.applied_delay, 10.0);
        assert_eq!(permit.duration, 12.0);
        assert_eq!(permit.finish, 17.0);
        let build = s.realized("Build").unwrap();
        assert_eq!((build.start, build.finish), (17.0, 25.0));

        assert_eq!(s.project_duration(), 25.0);
        assert!((s.efficiency() - 0.52).abs() < 1e-12);
    }

    #[test]
    fn test_scenario_full_lean_improvement() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = ScheduleBuilder::new()
            .build(&plan_permit_build(), 1.0, &mut rng)
            .unwrap();

        let permit = s.realized("Permit").unwrap();
        assert_eq!(permit.applied_delay, 0.0);
        assert_eq!(permit.duration, 2.0);
        assert_eq!(permit.finish, 7.0);
        assert_eq!(s.realized("Build").unwrap().finish, 15.0);
        assert_eq!(s.project_duration(), 15.0);
        assert!((s.efficiency() - 13.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_and_join_waits_for_latest_predecessor() {
        let acts = vec![
            Activity::value_adding("A").with_fixed_duration(3.0),
            Activity::value_adding("B").with_fixed_duration(7.0),
            Activity::value_adding("C")
                .with_fixed_duration(1.0)
                .with_predecessor("A")
                .with_predecessor("B"),
        ];
        let s = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(s.realized("C").unwrap().start, 7.0);
        assert_eq!(s.project_duration(), 8.0);
        // Parallel value-adding work: 11 days of work in an 8-day project.
        assert!((s.efficiency() - 11.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let mut acts = plan_permit_build();
        acts.reverse();
        let s = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let ids: Vec<&str> = s.activities().iter().map(|a| a.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["Plan", "Permit", "Build"]);
        assert_eq!(s.project_duration(), 25.0);
    }

    #[test]
    fn test_start_time_offset() {
        let s = ScheduleBuilder::new()
            .with_start_time(100.0)
            .build(&plan_permit_build(), 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(s.realized("Plan").unwrap().start, 100.0);
        assert_eq!(s.finish_time(), 125.0);
        assert_eq!(s.project_duration(), 25.0);
    }

    #[test]
    fn test_cycle_consumes_no_randomness() {
        let acts = vec![
            Activity::value_adding("A")
                .with_duration(Distribution::uniform(1.0, 2.0))
                .with_predecessor("B"),
            Activity::value_adding("B")
                .with_duration(Distribution::uniform(1.0, 2.0))
                .with_predecessor("A"),
        ];
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(0),
            draws: 0,
        };
        let err = ScheduleBuilder::new().build(&acts, 0.0, &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::CyclicDependency { .. }));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_unknown_predecessor() {
        let acts = vec![Activity::value_adding("A").with_predecessor("ghost")];
        let err = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SimulationError::UnknownPredecessor { .. }));
    }

    #[test]
    fn test_invalid_lean_factor() {
        let err = ScheduleBuilder::new()
            .build(&plan_permit_build(), 1.5, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
    }

    #[test]
    fn test_all_non_value_adding_zero_length() {
        let acts = vec![Activity::non_value_adding("wait").with_fixed_duration(0.0)];
        let s = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(s.project_duration(), 0.0);
        assert_eq!(s.efficiency(), 0.0);
    }

    #[test]
    fn test_fallback_delay_model() {
        let acts = vec![Activity::non_value_adding("mobilize").with_fixed_duration(1.0)];
        let builder = ScheduleBuilder::new().with_delay_model(
            DelayModel::new().with_fallback(DelaySpec::always(Distribution::fixed(4.0))),
        );
        let s = builder
            .build(&acts, 0.5, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(s.project_duration(), 3.0);
    }

    #[test]
    fn test_long_chain_builds() {
        let acts: Vec<Activity> = (0..50_000)
            .map(|i| {
                let act = Activity::value_adding(format!("A{i}")).with_fixed_duration(1.0);
                if i == 0 {
                    act
                } else {
                    act.with_predecessor(format!("A{}", i - 1))
                }
            })
            .collect();
        let s = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(s.len(), 50_000);
        assert_eq!(s.project_duration(), 50_000.0);
    }

    #[test]
    fn test_malformed_duration_rejected_before_sampling() {
        let acts = vec![Activity::value_adding("A").with_duration(Distribution::uniform(5.0, 1.0))];
        let err = ScheduleBuilder::new()
            .build(&acts, 0.0, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidActivity { .. }));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let acts = reference::construction_project();
        let builder = ScheduleBuilder::new();
        let a = builder.build(&acts, 0.3, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = builder.build(&acts, 0.3, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reference_project_bounds() {
        // Critical path without delay: 20+10+5+15+25+20+10+5 = 110.
        let acts = reference::construction_project();
        let builder = ScheduleBuilder::new();
        let best = builder.build(&acts, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(best.project_duration(), 110.0);
        for seed in 0..50 {
            let s = builder.build(&acts, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(s.project_duration() >= 110.0);
            assert!(s.project_duration() <= 118.0);
        }
    }

    proptest! {
        #[test]
        fn prop_schedule_invariants(seed in any::<u64>(), lean in 0.0f64..=1.0) {
            let acts = reference::construction_project();
            let s = ScheduleBuilder::new()
                .build(&acts, lean, &mut StdRng::seed_from_u64(seed))
                .unwrap();

            prop_assert_eq!(s.len(), acts.len());
            let mut max_finish = 0.0f64;
            for r in s.activities() {
                prop_assert_eq!(r.finish, r.start + r.duration);
                prop_assert!(r.duration >= r.base_duration);
                prop_assert!(r.applied_delay >= 0.0);
                if r.is_value_adding() {
                    prop_assert_eq!(r.applied_delay, 0.0);
                }
                let act = acts.iter().find(|a| a.id == r.activity_id).unwrap();
                let latest_pred = act
                    .predecessors
                    .iter()
                    .map(|p| s.realized(p).unwrap().finish)
                    .fold(0.0f64, f64::max);
                prop_assert_eq!(r.start, latest_pred);
                max_finish = max_finish.max(r.finish);
            }
            prop_assert_eq!(s.project_duration(), max_finish);
        }
    }
}
