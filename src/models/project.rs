//! Validated project network.
//!
//! A project is an activity set whose structure has been checked once:
//! every activity is well-formed, IDs are unique, predecessors resolve,
//! and the precedence graph is acyclic. The processing order is computed
//! at construction so simulation runs never re-validate and a malformed
//! network never reaches the random source.

use std::collections::HashMap;

use super::Activity;
use crate::error::Result;
use crate::validation::{topological_order, validate_activities};

/// A validated, topologically ordered set of activities.
#[derive(Debug, Clone)]
pub struct Project {
    activities: Vec<Activity>,
    order: Vec<usize>,
    index: HashMap<String, usize>,
}

impl Project {
    /// Validates `activities` and fixes their processing order.
    ///
    /// # Errors
    /// The first structural problem found: `InvalidActivity`,
    /// `DuplicateActivity`, `UnknownPredecessor` or `CyclicDependency`.
    pub fn new(activities: Vec<Activity>) -> Result<Self> {
        if let Err(errors) = validate_activities(&activities) {
            if let Some(first) = errors.into_iter().next() {
                return Err(first);
            }
        }
        let order = topological_order(&activities)?;
        let index = activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        Ok(Self {
            activities,
            order,
            index,
        })
    }

    /// Activities in input order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Processing order as indices into [`activities`](Self::activities).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Activities in processing (topological) order.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (usize, &Activity)> + '_ {
        self.order.iter().map(move |&i| (i, &self.activities[i]))
    }

    /// Index of an activity by ID.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Looks up an activity by ID.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.index_of(id).map(|i| &self.activities[i])
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the project has no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Predecessor indices of the activity at `idx`.
    pub(crate) fn predecessor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.activities[idx]
            .predecessors
            .iter()
            .filter_map(move |p| self.index.get(p).copied())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::models::Distribution;

    #[test]
    fn test_project_order_and_lookup() {
        let project = Project::new(vec![
            Activity::value_adding("build").with_predecessor("plan"),
            Activity::value_adding("plan"),
        ])
        .unwrap();

        assert_eq!(project.len(), 2);
        assert_eq!(project.order(), &[1, 0]);
        assert_eq!(project.get("plan").unwrap().id, "plan");
        assert!(project.get("ghost").is_none());
        let ids: Vec<&str> = project.iter_in_order().map(|(_, a)| a.id.as_str()).collect();
        assert_eq!(ids, vec!["plan", "build"]);
        let preds: Vec<usize> = project.predecessor_indices(0).collect();
        assert_eq!(preds, vec![1]);
    }

    #[test]
    fn test_project_rejects_cycle() {
        let err = Project::new(vec![
            Activity::value_adding("A").with_predecessor("B"),
            Activity::value_adding("B").with_predecessor("A"),
        ])
        .unwrap_err();
        assert!(matches!(err, SimulationError::CyclicDependency { .. }));
    }

    #[test]
    fn test_project_rejects_unknown_predecessor() {
        let err = Project::new(vec![Activity::value_adding("A").with_predecessor("Z")]).unwrap_err();
        assert!(matches!(err, SimulationError::UnknownPredecessor { .. }));
    }

    #[test]
    fn test_project_rejects_malformed_activity() {
        let err = Project::new(vec![
            Activity::value_adding("A").with_duration(Distribution::triangular(3.0, 9.0, 4.0))
        ])
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidActivity { .. }));
    }

    #[test]
    fn test_empty_project() {
        let project = Project::new(Vec::new()).unwrap();
        assert!(project.is_empty());
    }
}
