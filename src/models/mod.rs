//! Project domain models.
//!
//! Provides the data types for describing a construction project and the
//! realized outcome of simulating it.
//!
//! | Type | Role |
//! |------|------|
//! | Activity | Schedulable unit of work with a duration law |
//! | Distribution | Closed set of duration/delay laws |
//! | Project | Validated, ordered activity network |
//! | Schedule | One realized run (start/finish per activity) |
//! | RunResult | Scalar summary of one run |

mod activity;
mod distribution;
mod project;
pub mod reference;
mod schedule;

pub use activity::{Activity, ActivityKind, DelaySpec};
pub use distribution::Distribution;
pub use project::Project;
pub use schedule::{RealizedActivity, RunResult, Schedule};
