use rand::Rng;

use crate::error::{Error, Result};

/// A finite set of actions `{0, 1, ..., n - 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    n: usize,
}

impl Discrete {
    /// **Errors** if `n` is zero
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidConfig(
                "action space must contain at least one action".into(),
            ));
        }
        Ok(Self { n })
    }

    /// Number of actions
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }

    /// Sample an action uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }
}

/// A box in R<sup>n</sup> bounded by `low` and `high`
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoxSpace {
    /// **Errors** if the bounds differ in shape or if any `low` component exceeds `high`
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self> {
        if low.len() != high.len() {
            return Err(Error::InvalidConfig(format!(
                "observation bounds differ in shape: low has {} components, high has {}",
                low.len(),
                high.len()
            )));
        }
        if let Some(i) = low.iter().zip(&high).position(|(l, h)| l > h) {
            return Err(Error::InvalidConfig(format!(
                "observation bound {i}: low {} is greater than high {}",
                low[i], high[i]
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Number of components
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    pub fn contains(&self, obs: &[f64]) -> bool {
        obs.len() == self.dim()
            && obs
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(x, (l, h))| x >= l && x <= h)
    }

    /// Sample a point uniformly from the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&l, &h)| l + rng.gen::<f64>() * (h - l))
            .collect()
    }
}
