use std::collections::HashMap;

use rand::{distributions::Bernoulli, rngs::StdRng, Rng, SeedableRng};

use crate::{
    env::{validate_actions, BoxSpace, Discrete, EnvError, MultiAgentEnvironment, Transition},
    error::{Error, Result},
};

/// Probability that an active agent finishes on a given step
const DONE_PROBABILITY: f64 = 0.1;

/// A placeholder multi-agent environment with random dynamics
///
/// Observations are drawn uniformly from the observation box, rewards uniformly from
/// `{-1, 0, 1}`, and each active agent finishes with probability 0.1 per step. An agent
/// that is done keeps its last observation until the next [`reset`](MultiAgentEnvironment::reset).
///
/// Useful as a stand-in when wiring agents to the driver loop, it carries no real task.
#[derive(Debug, Clone)]
pub struct GenericEnv {
    action_spaces: Vec<Discrete>,
    observation_space: BoxSpace,
    observations: Vec<Vec<f64>>,
    dones: Vec<bool>,
    done_dist: Bernoulli,
    rng: StdRng,
}

impl GenericEnv {
    /// Build an environment with `n_agents` agents that share the same action count and
    /// observation bounds
    ///
    /// **Errors** if `n_agents` or `n_actions` is zero, or if the bounds differ in shape
    pub fn new(n_agents: usize, n_actions: usize, low: Vec<f64>, high: Vec<f64>) -> Result<Self> {
        Self::with_rng(n_agents, n_actions, low, high, StdRng::from_entropy())
    }

    /// Like [`GenericEnv::new`], with reproducible dynamics
    pub fn seeded(
        n_agents: usize,
        n_actions: usize,
        low: Vec<f64>,
        high: Vec<f64>,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(n_agents, n_actions, low, high, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        n_agents: usize,
        n_actions: usize,
        low: Vec<f64>,
        high: Vec<f64>,
        rng: StdRng,
    ) -> Result<Self> {
        if n_agents == 0 {
            return Err(Error::InvalidConfig(
                "the number of agents must be greater than zero".into(),
            ));
        }
        let action_space = Discrete::new(n_actions)?;
        let observation_space = BoxSpace::new(low, high)?;
        let done_dist = Bernoulli::new(DONE_PROBABILITY)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let mut env = Self {
            action_spaces: vec![action_space; n_agents],
            observation_space,
            observations: Vec::new(),
            dones: vec![false; n_agents],
            done_dist,
            rng,
        };
        env.observations = env.draw_joint();
        Ok(env)
    }

    pub fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    /// Done flags of the current episode
    pub fn dones(&self) -> &[bool] {
        &self.dones
    }

    /// One random observation shared by every agent
    fn draw_joint(&mut self) -> Vec<Vec<f64>> {
        let obs = self.observation_space.sample(&mut self.rng);
        vec![obs; self.action_spaces.len()]
    }
}

impl MultiAgentEnvironment for GenericEnv {
    type Observation = Vec<f64>;

    fn n_agents(&self) -> usize {
        self.action_spaces.len()
    }

    fn action_space(&self, agent: usize) -> &Discrete {
        &self.action_spaces[agent]
    }

    fn reset(&mut self) -> std::result::Result<Vec<Vec<f64>>, EnvError> {
        self.dones.iter_mut().for_each(|d| *d = false);
        self.observations = self.draw_joint();
        Ok(self.observations.clone())
    }

    fn step(
        &mut self,
        actions: &[usize],
    ) -> std::result::Result<Transition<Vec<f64>>, EnvError> {
        validate_actions(&self.action_spaces, actions)?;

        let candidate = self.draw_joint();
        for (i, obs) in candidate.into_iter().enumerate() {
            if !self.dones[i] {
                self.observations[i] = obs;
            }
        }

        let rewards = (0..self.n_agents())
            .map(|_| self.rng.gen_range(-1..=1) as f64)
            .collect();

        let done_dist = self.done_dist;
        for done in self.dones.iter_mut().filter(|d| !**d) {
            *done = self.rng.sample(done_dist);
        }

        Ok(Transition {
            observations: self.observations.clone(),
            rewards,
            dones: self.dones.clone(),
            info: HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> GenericEnv {
        GenericEnv::seeded(4, 4, vec![0.0, 0.0, 0.0], vec![100.0, 100.0, 100.0], 42).unwrap()
    }

    #[test]
    fn construction_validation() {
        assert!(GenericEnv::new(0, 4, vec![0.0], vec![1.0]).is_err(), "no agents");
        assert!(GenericEnv::new(2, 0, vec![0.0], vec![1.0]).is_err(), "no actions");
        assert!(
            GenericEnv::new(2, 4, vec![0.0, 0.0], vec![1.0]).is_err(),
            "bounds shape mismatch"
        );
    }

    #[test]
    fn runs_until_all_done() {
        let mut env = env();
        let obs = env.reset().unwrap();
        assert_eq!(obs.len(), 4, "one observation per agent");
        assert!(obs.iter().all(|o| env.observation_space().contains(o)));

        let mut steps = 0;
        let mut prev_dones = vec![false; 4];
        while !env.dones().iter().all(|&d| d) {
            let t = env.step(&[0, 1, 2, 3]).unwrap();
            steps += 1;
            assert_eq!(t.rewards.len(), 4);
            assert!(t.rewards.iter().all(|r| [-1.0, 0.0, 1.0].contains(r)));
            for i in 0..4 {
                assert!(!prev_dones[i] || t.dones[i], "done is sticky");
            }
            prev_dones = t.dones;
            assert!(steps < 10_000, "episode terminates");
        }

        env.reset().unwrap();
        assert!(env.dones().iter().all(|&d| !d), "reset clears dones");
    }

    #[test]
    fn done_agents_keep_observation() {
        let mut env = env();
        env.reset().unwrap();
        let mut frozen: Vec<Option<Vec<f64>>> = vec![None; 4];
        for _ in 0..200 {
            let t = env.step(&[0; 4]).unwrap();
            for i in 0..4 {
                if let Some(obs) = &frozen[i] {
                    assert_eq!(&t.observations[i], obs, "done agent is frozen");
                } else if t.dones[i] {
                    frozen[i] = Some(t.observations[i].clone());
                }
            }
        }
    }

    #[test]
    fn rejects_bad_actions() {
        let mut env = env();
        assert!(matches!(
            env.step(&[0, 0]),
            Err(EnvError::ActionCount { expected: 4, found: 2 })
        ));
        assert!(matches!(
            env.step(&[0, 0, 0, 4]),
            Err(EnvError::InvalidAction { agent: 3, .. })
        ));
    }
}
