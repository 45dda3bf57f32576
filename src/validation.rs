//! Input validation for project networks.
//!
//! Checks structural integrity of an activity set before any simulation
//! runs. Detects:
//! - Malformed activities (bad distribution parameters, self-loops)
//! - Duplicate IDs
//! - Unknown predecessor references
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{Result, SimulationError};
use crate::models::Activity;

/// Validation result listing every detected problem.
pub type ValidationResult = std::result::Result<(), Vec<SimulationError>>;

/// Validates an activity set.
///
/// Checks:
/// 1. Every activity is well-formed on its own
/// 2. No duplicate activity IDs
/// 3. All predecessor references point to existing activities
/// 4. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_activities(activities: &[Activity]) -> ValidationResult {
    let mut errors = Vec::new();

    for act in activities {
        if let Err(e) = act.validate() {
            errors.push(e);
        }
    }

    let mut ids = HashSet::new();
    for act in activities {
        if !ids.insert(act.id.as_str()) {
            errors.push(SimulationError::DuplicateActivity(act.id.clone()));
        }
    }

    for act in activities {
        for pred in &act.predecessors {
            if !ids.contains(pred.as_str()) {
                errors.push(SimulationError::UnknownPredecessor {
                    activity: act.id.clone(),
                    predecessor: pred.clone(),
                });
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(activities) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// Unknown predecessors are ignored here; they are reported separately.
/// Roots are visited in input order so the reported activity is stable.
///
/// # Algorithm
/// Iterative DFS with an explicit stack of `(node, next successor)` frames,
/// so arbitrarily long chains do not exhaust the call stack. If a back-edge
/// is found (reaching a node currently on the stack), a cycle exists and
/// the back-edge target lies on it.
pub fn detect_cycles(activities: &[Activity]) -> Option<SimulationError> {
    // Build adjacency list: activity_id → successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let known: HashSet<&str> = activities.iter().map(|a| a.id.as_str()).collect();

    for act in activities {
        for pred in &act.predecessors {
            if known.contains(pred.as_str()) {
                adj.entry(pred.as_str()).or_default().push(act.id.as_str());
            }
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut in_stack: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for act in activities {
        let root = act.id.as_str();
        if !visited.insert(root) {
            continue;
        }
        in_stack.insert(root);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            let successors = adj.get(node).map(Vec::as_slice).unwrap_or(&[]);
            match successors.get(pos) {
                Some(&next) => {
                    frame.1 += 1;
                    if in_stack.contains(next) {
                        // Back edge → cycle
                        return Some(SimulationError::CyclicDependency {
                            activity: next.to_string(),
                        });
                    }
                    if visited.insert(next) {
                        in_stack.insert(next);
                        stack.push((next, 0));
                    }
                }
                None => {
                    in_stack.remove(node);
                    stack.pop();
                }
            }
        }
    }

    None
}

/// Computes a topological processing order (indices into `activities`).
///
/// Kahn's algorithm; among ready activities the one appearing first in the
/// input goes first, so an input that is already topologically sorted is
/// returned unchanged.
///
/// # Errors
/// `UnknownPredecessor` for dangling references, `CyclicDependency` when no
/// linearization exists.
pub fn topological_order(activities: &[Activity]) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = activities
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; activities.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); activities.len()];

    for (i, act) in activities.iter().enumerate() {
        for pred in &act.predecessors {
            let &p = index
                .get(pred.as_str())
                .ok_or_else(|| SimulationError::UnknownPredecessor {
                    activity: act.id.clone(),
                    predecessor: pred.clone(),
                })?;
            successors[p].push(i);
            in_degree[i] += 1;
        }
    }

    // Min-ordered ready set keeps the result independent of hashing.
    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(i, _)| i)
        .collect();
    let mut order = Vec::with_capacity(activities.len());

    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &s in &successors[i] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.insert(s);
            }
        }
    }

    if order.len() < activities.len() {
        let activity = detect_cycles(activities)
            .and_then(|e| match e {
                SimulationError::CyclicDependency { activity } => Some(activity),
                _ => None,
            })
            .or_else(|| {
                // Fall back to any activity left unprocessed.
                let done: HashSet<usize> = order.iter().copied().collect();
                (0..activities.len())
                    .find(|i| !done.contains(i))
                    .map(|i| activities[i].id.clone())
            })
            .unwrap_or_default();
        return Err(SimulationError::CyclicDependency { activity });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Distribution};

    fn chain() -> Vec<Activity> {
        vec![
            Activity::value_adding("O1").with_fixed_duration(1.0),
            Activity::value_adding("O2")
                .with_fixed_duration(1.0)
                .with_predecessor("O1"),
            Activity::value_adding("O3")
                .with_fixed_duration(1.0)
                .with_predecessor("O2"),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_activities(&chain()).is_ok());
    }

    #[test]
    fn test_duplicate_activity_id() {
        let acts = vec![Activity::value_adding("O1"), Activity::value_adding("O1")];
        let errors = validate_activities(&acts).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, SimulationError::DuplicateActivity(id) if id == "O1")));
    }

    #[test]
    fn test_invalid_predecessor() {
        let acts = vec![Activity::value_adding("O1").with_predecessor("NONEXISTENT")];
        let errors = validate_activities(&acts).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, SimulationError::UnknownPredecessor { .. })));
    }

    #[test]
    fn test_cyclic_dependency() {
        // O1 → O2 → O3 → O1 (cycle)
        let mut acts = chain();
        acts[0].predecessors.push("O3".into());
        let errors = validate_activities(&acts).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, SimulationError::CyclicDependency { .. })));
    }

    #[test]
    fn test_two_node_cycle_reports_member() {
        let acts = vec![
            Activity::value_adding("A").with_predecessor("B"),
            Activity::value_adding("B").with_predecessor("A"),
        ];
        match detect_cycles(&acts) {
            Some(SimulationError::CyclicDependency { activity }) => {
                assert!(activity == "A" || activity == "B");
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_no_cycle_in_chain() {
        assert!(detect_cycles(&chain()).is_none());
    }

    #[test]
    fn test_multiple_errors() {
        let acts = vec![
            Activity::value_adding("O1").with_duration(Distribution::uniform(3.0, 1.0)),
            Activity::value_adding("O1").with_predecessor("UNKNOWN"),
        ];
        let errors = validate_activities(&acts).unwrap_err();
        assert!(errors.len() >= 3);
    }

    fn long_chain(n: usize) -> Vec<Activity> {
        (0..n)
            .map(|i| {
                let act = Activity::value_adding(format!("A{i}")).with_fixed_duration(1.0);
                if i == 0 {
                    act
                } else {
                    act.with_predecessor(format!("A{}", i - 1))
                }
            })
            .collect()
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let acts = long_chain(60_000);
        assert!(validate_activities(&acts).is_ok());
        assert_eq!(topological_order(&acts).unwrap().len(), 60_000);
    }

    #[test]
    fn test_long_chain_closing_cycle() {
        let mut acts = long_chain(60_000);
        acts[0].predecessors.push("A59999".into());
        assert!(matches!(
            detect_cycles(&acts),
            Some(SimulationError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_topological_order_preserves_sorted_input() {
        assert_eq!(topological_order(&chain()).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_topological_order_reorders() {
        // Input lists the successor first.
        let acts = vec![
            Activity::value_adding("build").with_predecessor("plan"),
            Activity::value_adding("plan"),
            Activity::value_adding("inspect").with_predecessor("build"),
        ];
        assert_eq!(topological_order(&acts).unwrap(), vec![1, 0, 2]);
    }

    #[test]
    fn test_topological_order_diamond() {
        let acts = vec![
            Activity::value_adding("A"),
            Activity::value_adding("B").with_predecessor("A"),
            Activity::value_adding("C").with_predecessor("A"),
            Activity::value_adding("D")
                .with_predecessor("B")
                .with_predecessor("C"),
        ];
        assert_eq!(topological_order(&acts).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_topological_order_cycle() {
        let acts = vec![
            Activity::value_adding("A").with_predecessor("B"),
            Activity::value_adding("B").with_predecessor("A"),
        ];
        assert!(matches!(
            topological_order(&acts),
            Err(SimulationError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_topological_order_unknown_predecessor() {
        let acts = vec![Activity::value_adding("A").with_predecessor("Z")];
        assert!(matches!(
            topological_order(&acts),
            Err(SimulationError::UnknownPredecessor { .. })
        ));
    }
}
