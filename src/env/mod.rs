use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

mod spaces;

pub use spaces::{BoxSpace, Discrete};

/// Failure reported by an environment collaborator
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Got {found} actions for {expected} agents")]
    ActionCount { expected: usize, found: usize },

    #[error("Action {action} is outside the action space of agent {agent} (n = {n})")]
    InvalidAction { agent: usize, action: usize, n: usize },

    #[error("{0}")]
    Message(String),

    #[error("Environment error: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Outcome of a joint step, one entry per agent in agent order
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    pub observations: Vec<O>,
    pub rewards: Vec<f64>,
    pub dones: Vec<bool>,
    /// Auxiliary diagnostics
    pub info: HashMap<String, f64>,
}

/// A discrete-time environment shared by several agents that act simultaneously.
///
/// Each agent has its own discrete action space. All agents submit one action per
/// step and receive their own observation, reward and done flag.
pub trait MultiAgentEnvironment {
    /// What a single agent observes
    type Observation;

    /// Number of agents acting in the environment
    fn n_agents(&self) -> usize;

    /// Action space of the agent at index `agent`
    ///
    /// **Panics** may occur if `agent >= self.n_agents()`
    fn action_space(&self, agent: usize) -> &Discrete;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the joint observation
    fn reset(&mut self) -> Result<Vec<Self::Observation>, EnvError>;

    /// Apply the joint action, one action per agent in agent order
    fn step(&mut self, actions: &[usize]) -> Result<Transition<Self::Observation>, EnvError>;

    /// Number of actions available to `agent`
    fn action_count(&self, agent: usize) -> usize {
        self.action_space(agent).n()
    }

    /// Uniformly sample an action for `agent`
    fn sample_action<R: Rng + ?Sized>(&self, agent: usize, rng: &mut R) -> usize
    where
        Self: Sized,
    {
        self.action_space(agent).sample(rng)
    }
}

/// Check a joint action against the agents' action spaces
pub fn validate_actions(spaces: &[Discrete], actions: &[usize]) -> Result<(), EnvError> {
    if actions.len() != spaces.len() {
        return Err(EnvError::ActionCount {
            expected: spaces.len(),
            found: actions.len(),
        });
    }
    for (agent, (space, &action)) in spaces.iter().zip(actions).enumerate() {
        if !space.contains(action) {
            return Err(EnvError::InvalidAction {
                agent,
                action,
                n: space.n(),
            });
        }
    }
    Ok(())
}
