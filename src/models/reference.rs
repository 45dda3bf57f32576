//! Reference construction project.
//!
//! A nine-activity residential build used as the default network when no
//! activity set is configured. Permitting and mobilization are the only
//! non-value-adding activities; both carry an uncertain delay.

use super::{Activity, DelaySpec, Distribution};

/// Builds the reference construction project.
///
/// ```text
/// Planning → Permitting → Mobilization → Excavation → Structure ─┬→ Masonry ──────┬→ Finishing → Inspection
///                                                                 └→ Installations ┘
/// ```
pub fn construction_project() -> Vec<Activity> {
    vec![
        Activity::value_adding("planning")
            .with_name("Planning")
            .with_fixed_duration(20.0),
        Activity::non_value_adding("permitting")
            .with_name("Permitting")
            .with_fixed_duration(10.0)
            .with_predecessor("planning")
            .with_delay(DelaySpec::always(Distribution::uniform(0.0, 5.0)).with_probability(0.8)),
        Activity::non_value_adding("mobilization")
            .with_name("Mobilization")
            .with_fixed_duration(5.0)
            .with_predecessor("permitting")
            .with_delay(DelaySpec::always(Distribution::uniform(0.0, 3.0)).with_probability(0.7)),
        Activity::value_adding("excavation")
            .with_name("Excavation")
            .with_fixed_duration(15.0)
            .with_predecessor("mobilization"),
        Activity::value_adding("structure")
            .with_name("Structure")
            .with_fixed_duration(25.0)
            .with_predecessor("excavation"),
        Activity::value_adding("masonry")
            .with_name("Masonry")
            .with_fixed_duration(20.0)
            .with_predecessor("structure"),
        Activity::value_adding("installations")
            .with_name("Installations")
            .with_fixed_duration(10.0)
            .with_predecessor("structure"),
        Activity::value_adding("finishing")
            .with_name("Finishing")
            .with_fixed_duration(10.0)
            .with_predecessor("masonry")
            .with_predecessor("installations"),
        Activity::value_adding("inspection")
            .with_name("Inspection")
            .with_fixed_duration(5.0)
            .with_predecessor("finishing"),
    ]
}
