use crate::{
    error::{Error, Result},
    util::check_interval,
};

/// Learning and exploration hyperparameters shared by every agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperParams {
    /// Learning rate in `(0,1]`
    pub alpha: f64,
    /// Discount factor in `[0,1]`
    pub gamma: f64,
    /// Initial exploration threshold
    pub epsilon: f64,
    /// Exploration floor, at most `epsilon`
    pub min_epsilon: f64,
    /// Multiplicative epsilon decay applied on every action choice
    pub decay: f64,
}

impl Default for HyperParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon: 0.05,
            min_epsilon: 0.005,
            decay: 1.0,
        }
    }
}

impl HyperParams {
    pub fn validate(&self) -> Result<()> {
        let &Self {
            alpha,
            gamma,
            epsilon,
            min_epsilon,
            decay,
        } = self;
        check_interval!(alpha, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);
        check_interval!(epsilon, 0.0, 1.0);
        check_interval!(min_epsilon, 0.0, 1.0);
        check_interval!(decay, 0.0, 1.0);
        if alpha == 0.0 {
            return Err(Error::InvalidConfig(
                "learning rate `alpha` must be greater than zero".into(),
            ));
        }
        if min_epsilon > epsilon {
            return Err(Error::InvalidConfig(format!(
                "`min_epsilon` ({min_epsilon}) is greater than `epsilon` ({epsilon})"
            )));
        }
        Ok(())
    }
}

/// Training budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainConfig {
    /// Episodes per run
    pub episodes: u32,
    /// Step cap per episode, `None` to wait for every agent to finish
    pub max_steps: Option<usize>,
    /// Independent runs, each with freshly initialized agents
    pub runs: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: Some(1000),
            runs: 1,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfig("`episodes` must be at least 1".into()));
        }
        if self.runs == 0 {
            return Err(Error::InvalidConfig("`runs` must be at least 1".into()));
        }
        if self.max_steps == Some(0) {
            return Err(Error::InvalidConfig("`max_steps` must be at least 1".into()));
        }
        Ok(())
    }
}
