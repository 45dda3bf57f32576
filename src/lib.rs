//! Lean construction schedule simulation for the U-Engine ecosystem.
//!
//! Simulates a construction project as a finish-to-start network of
//! value-adding and non-value-adding activities. Non-value-adding work is
//! subject to stochastic delay, scaled down by a Lean improvement factor
//! in [0, 1].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Activity`, `Distribution`, `Project`,
//!   `Schedule`, `RunResult`, and the reference construction project
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   predecessors, DAG cycles) and topological ordering
//! - **`simulation`**: Delay model, schedule builder, Monte Carlo runner,
//!   statistics, and the detailed / Monte Carlo mode selector
//! - **`config`**: JSON run configuration
//!
//! # Determinism
//!
//! Randomness is always injected. Given the same activities, Lean factor,
//! iteration count and seed, results are bit-identical, whether iterations
//! run sequentially or in parallel.
//!
//! # References
//!
//! - Koskela (1992), "Application of the New Production Philosophy to Construction"
//! - Law (2015), "Simulation Modeling and Analysis"

pub mod config;
pub mod error;
pub mod models;
pub mod simulation;
pub mod validation;

pub use error::{Result, SimulationError};
