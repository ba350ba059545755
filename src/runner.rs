use log::{debug, info, warn};

use crate::{
    algo::{QTableAgent, QTableAgentConfig},
    config::HyperParams,
    discretize::Discretizer,
    env::{MultiAgentEnvironment, Transition},
    error::{Error, Result},
};

/// Summary of a finished episode, per-agent vectors in agent order
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub episode: u32,
    pub steps: usize,
    /// Reward collected by each agent during the episode
    pub rewards: Vec<f64>,
    /// Each agent's epsilon at the end of the episode
    pub epsilons: Vec<f64>,
    /// Whether the step cap ended the episode before every agent was done
    pub truncated: bool,
}

/// Drives one independent Q-learning agent per environment agent
///
/// Agents act and learn sequentially within a step. Their tables never interact, the
/// environment is the only thing they share.
pub struct Runner<E, Z>
where
    E: MultiAgentEnvironment,
    Z: Discretizer<E::Observation>,
{
    env: E,
    discretizer: Z,
    agents: Vec<QTableAgent<Z::Key>>,
    episode: u32,
}

impl<E, Z> Runner<E, Z>
where
    E: MultiAgentEnvironment,
    Z: Discretizer<E::Observation>,
{
    /// Reset `env` and create an agent in each agent's initial state
    ///
    /// With a `seed`, agent `i` explores with seed `seed + i`.
    pub fn new(mut env: E, discretizer: Z, params: &HyperParams, seed: Option<u64>) -> Result<Self> {
        let n = env.n_agents();
        if n == 0 {
            return Err(Error::InvalidConfig(
                "the environment must have at least one agent".into(),
            ));
        }

        let observations = env.reset()?;
        check_len(n, observations.len())?;
        let keys = discretizer.keys(&observations)?;

        let agents = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                let config =
                    QTableAgentConfig::from_params(params, seed.map(|s| s.wrapping_add(i as u64)))?;
                QTableAgent::new(config, key, *env.action_space(i))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            env,
            discretizer,
            agents,
            episode: 0,
        })
    }

    pub fn agents(&self) -> &[QTableAgent<Z::Key>] {
        &self.agents
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Episodes completed so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Run a single episode until every agent is done or `max_steps` steps have been taken
    pub fn run_episode(&mut self, max_steps: Option<usize>) -> Result<EpisodeReport> {
        let n = self.agents.len();

        let observations = self.env.reset()?;
        check_len(n, observations.len())?;
        let keys = self.discretizer.keys(&observations)?;
        for (agent, key) in self.agents.iter_mut().zip(keys) {
            agent.begin_episode(key);
        }

        let mut rewards = vec![0.0; n];
        let mut dones = vec![false; n];
        let mut steps = 0;
        let mut truncated = false;

        while !dones.iter().all(|&d| d) {
            if max_steps.is_some_and(|max| steps >= max) {
                warn!("Episode {} cut at {steps} steps", self.episode);
                truncated = true;
                break;
            }

            let actions = self
                .agents
                .iter_mut()
                .map(QTableAgent::choose_action)
                .collect::<Result<Vec<_>>>()?;

            let Transition {
                observations,
                rewards: step_rewards,
                dones: step_dones,
                ..
            } = self.env.step(&actions)?;
            check_len(n, observations.len())?;
            check_len(n, step_rewards.len())?;
            check_len(n, step_dones.len())?;
            debug!("actions {actions:?} rewards {step_rewards:?}");

            let next_keys = self.discretizer.keys(&observations)?;
            for (i, (agent, next_key)) in self.agents.iter_mut().zip(next_keys).enumerate() {
                // terminal flags end the episode but do not reach the update
                agent.learn(next_key, step_rewards[i], false)?;
                rewards[i] += step_rewards[i];
            }

            dones = step_dones;
            steps += 1;
        }

        let report = EpisodeReport {
            episode: self.episode,
            steps,
            rewards,
            epsilons: self.agents.iter().map(QTableAgent::epsilon).collect(),
            truncated,
        };
        info!(
            "Episode {} finished after {} steps, rewards {:?}, epsilon {:?}",
            report.episode, report.steps, report.rewards, report.epsilons
        );

        self.episode += 1;
        Ok(report)
    }

    /// Run `episodes` consecutive episodes
    pub fn train(&mut self, episodes: u32, max_steps: Option<usize>) -> Result<Vec<EpisodeReport>> {
        (0..episodes).map(|_| self.run_episode(max_steps)).collect()
    }
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::AgentCount { expected, found });
    }
    Ok(())
}
