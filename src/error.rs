use thiserror::Error;

use crate::env::EnvError;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for `{name}`: {value}. Must be in the interval [{low}, {high}].")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("`learn` called before `choose_action`: the agent has no pending action")]
    NoPendingAction,

    #[error("State is not present in the Q-table")]
    UnknownState,

    #[error("Observation has {found} components, expected at least {expected}")]
    ObservationShape { expected: usize, found: usize },

    #[error("Observation component {component} has value {value}, which cannot be discretized")]
    ObservationValue { component: usize, value: f64 },

    #[error("Environment returned {found} entries for {expected} agents")]
    AgentCount { expected: usize, found: usize },

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
