/// Tabular learning algorithms
pub mod algo;

/// Hyperparameters and training budget
pub mod config;

/// Strategies for time-decaying hyperparameters
pub mod decay;

/// Observation discretization
pub mod discretize;

/// Multi-agent environment capability
pub mod env;

/// Crate-wide error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// CSV output of training reports
pub mod report;

/// The multi-agent training loop
pub mod runner;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::{Error, Result};
