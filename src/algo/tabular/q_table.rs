use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::HyperParams,
    decay::{Decay, Multiplicative},
    env::Discrete,
    error::{Error, Result},
    exploration::EpsilonGreedy,
    util::check_interval,
};

use super::Hashable;

/// Action values keyed by discretized state
///
/// Every entry holds exactly one value per action. Entries are created on first visit,
/// initialized to zero, and never removed.
#[derive(Debug, Clone)]
pub struct QTable<K: Hashable> {
    values: HashMap<K, Vec<f64>>,
    n_actions: usize,
}

impl<K: Hashable> QTable<K> {
    pub fn new(n_actions: usize) -> Self {
        Self {
            values: HashMap::new(),
            n_actions,
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Number of visited states
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, state: &K) -> bool {
        self.values.contains_key(state)
    }

    /// Action values of `state`, if visited
    pub fn get(&self, state: &K) -> Option<&[f64]> {
        self.values.get(state).map(Vec::as_slice)
    }

    /// Action values of `state`, inserting zeros on first visit
    pub fn entry(&mut self, state: K) -> &mut [f64] {
        let n = self.n_actions;
        self.values.entry(state).or_insert_with(|| vec![0.0; n])
    }

    /// Overwrite all action values of `state`
    ///
    /// **Panics** if `values` does not hold exactly one value per action
    pub fn insert(&mut self, state: K, values: Vec<f64>) {
        assert_eq!(values.len(), self.n_actions, "one value per action");
        self.values.insert(state, values);
    }

    /// Highest action value of `state`
    pub fn max_value(&self, state: &K) -> Option<f64> {
        self.get(state)?.iter().copied().reduce(f64::max)
    }

    /// Index of the highest action value of `state`, ties going to the lowest index
    pub fn greedy_action(&self, state: &K) -> Option<usize> {
        let values = self.get(state)?;
        let mut best = 0;
        for (a, &v) in values.iter().enumerate().skip(1) {
            if v > values[best] {
                best = a;
            }
        }
        (!values.is_empty()).then_some(best)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[f64])> {
        self.values.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay = Multiplicative> {
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate in `(0,1]`
    pub alpha: f64,
    /// Discount factor in `[0,1]`
    pub gamma: f64,
    /// Seed for the agent's exploration draws, taken from entropy if `None`
    pub seed: Option<u64>,
}

impl QTableAgentConfig<Multiplicative> {
    /// Build a configuration from validated hyperparameters
    pub fn from_params(params: &HyperParams, seed: Option<u64>) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            exploration: EpsilonGreedy::multiplicative(
                params.epsilon,
                params.min_epsilon,
                params.decay,
            )?,
            alpha: params.alpha,
            gamma: params.gamma,
            seed,
        })
    }
}

/// A tabular Q-learning agent
///
/// The agent owns its Q-table and exploration policy. Each step it first chooses an action
/// for its current state with [`choose_action`](QTableAgent::choose_action) and then
/// observes the outcome with [`learn`](QTableAgent::learn).
///
/// ### Generics
/// - `K` - The discretized state key
/// - `D` - The epsilon schedule of the exploration policy
pub struct QTableAgent<K: Hashable, D: Decay = Multiplicative> {
    state: K,
    action: Option<usize>,
    q_table: QTable<K>,
    action_space: Discrete,
    exploration: EpsilonGreedy<D>,
    alpha: f64,
    gamma: f64,
    total_reward: f64,
    rng: StdRng,
}

impl<K: Hashable, D: Decay> QTableAgent<K, D> {
    /// Initialize a new agent in `state`
    ///
    /// **Errors** if `alpha` is not in `(0,1]` or `gamma` is not in `[0,1]`
    pub fn new(config: QTableAgentConfig<D>, state: K, action_space: Discrete) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            seed,
        } = config;
        check_interval!(alpha, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);
        if alpha == 0.0 {
            return Err(Error::InvalidConfig(
                "learning rate `alpha` must be greater than zero".into(),
            ));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            state,
            action: None,
            q_table: QTable::new(action_space.n()),
            action_space,
            exploration,
            alpha,
            gamma,
            total_reward: 0.0,
            rng,
        })
    }

    /// Choose an action for the current state and remember it for the next [`learn`](Self::learn)
    pub fn choose_action(&mut self) -> Result<usize> {
        self.q_table.entry(self.state);
        let action = self.exploration.choose(
            &self.q_table,
            &self.state,
            &self.action_space,
            &mut self.rng,
        )?;
        self.action = Some(action);
        Ok(action)
    }

    /// Q-learning update for the pending action
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
    ///
    /// `done` is accepted but not used: terminal transitions still bootstrap from
    /// `next_state`.
    ///
    /// **Errors** with [`Error::NoPendingAction`] unless called after
    /// [`choose_action`](Self::choose_action); the table is left untouched in that case
    pub fn learn(&mut self, next_state: K, reward: f64, _done: bool) -> Result<()> {
        let action = self.action.take().ok_or(Error::NoPendingAction)?;

        self.q_table.entry(next_state);
        let max_next_q = self
            .q_table
            .max_value(&next_state)
            .ok_or(Error::UnknownState)?;

        let q_value = &mut self.q_table.entry(self.state)[action];
        let td_target = reward + self.gamma * max_next_q;
        let td_delta = td_target - *q_value;
        *q_value += self.alpha * td_delta;

        self.state = next_state;
        self.total_reward += reward;
        Ok(())
    }

    /// Start a new episode from `state`, dropping any pending action
    ///
    /// The Q-table, epsilon and the total reward carry over.
    pub fn begin_episode(&mut self, state: K) {
        self.state = state;
        self.action = None;
    }

    /// Restore the exploration policy's initial epsilon
    pub fn reset_exploration(&mut self) {
        self.exploration.reset();
    }

    pub fn state(&self) -> K {
        self.state
    }

    /// The action chosen but not yet learned from
    pub fn pending_action(&self) -> Option<usize> {
        self.action
    }

    pub fn q_table(&self) -> &QTable<K> {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable<K> {
        &mut self.q_table
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    /// Sum of every reward passed to [`learn`](Self::learn)
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }
}
