//! Error types for the simulation engine.
//!
//! Every variant is a structural or input error: it is detected before
//! any randomness is consumed and is never retried internally.

use thiserror::Error;

/// Errors raised while validating or simulating a project.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Malformed distribution parameters or a self-referencing predecessor.
    #[error("Invalid activity '{activity}': {reason}")]
    InvalidActivity {
        /// Offending activity ID.
        activity: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two activities share the same ID.
    #[error("Duplicate activity ID: {0}")]
    DuplicateActivity(String),

    /// A predecessor ID is not part of the activity set.
    #[error("Activity '{activity}' references unknown predecessor '{predecessor}'")]
    UnknownPredecessor {
        /// Activity declaring the predecessor.
        activity: String,
        /// The missing predecessor ID.
        predecessor: String,
    },

    /// The precedence graph contains a cycle.
    #[error("Circular dependency detected involving activity '{activity}'")]
    CyclicDependency {
        /// An activity that lies on the cycle.
        activity: String,
    },

    /// Lean factor outside [0, 1] or a non-positive iteration count.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

impl SimulationError {
    pub(crate) fn invalid_activity(activity: impl Into<String>, reason: impl Into<String>) -> Self {
        SimulationError::InvalidActivity {
            activity: activity.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from the project structure rather than run parameters.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SimulationError::InvalidActivity { .. }
                | SimulationError::DuplicateActivity(_)
                | SimulationError::UnknownPredecessor { .. }
                | SimulationError::CyclicDependency { .. }
        )
    }
}
