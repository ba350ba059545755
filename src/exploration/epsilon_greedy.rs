use rand::Rng;

use crate::{
    algo::tabular::{q_table::QTable, Hashable},
    decay::{Decay, Multiplicative},
    env::Discrete,
    error::{Error, Result},
};

use super::Choice;

/// Epsilon greedy exploration policy with a decaying epsilon threshold
///
/// Epsilon starts at the schedule's initial value and advances by one step of the
/// schedule on every [`choose`](EpsilonGreedy::choose) call.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay = Multiplicative> {
    schedule: D,
    epsilon: f64,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(schedule: D) -> Self {
        let epsilon = schedule.initial();
        Self { schedule, epsilon }
    }

    /// Current exploration threshold
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Restore epsilon to its initial value
    pub fn reset(&mut self) {
        self.epsilon = self.schedule.initial();
    }

    /// Draw a uniform number in `[0,1)` against the current threshold, then decay the threshold
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Choice {
        let choice = if rng.gen::<f64>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        };
        self.epsilon = self.schedule.next(self.epsilon);
        choice
    }

    /// Choose an action for `state`
    ///
    /// Explores with a uniformly sampled action from `action_space`, otherwise picks the
    /// first action with the highest value in `q_table`.
    ///
    /// **Errors** with [`Error::UnknownState`] if `state` has no entry in `q_table`; epsilon
    /// is left untouched in that case
    pub fn choose<K, R>(
        &mut self,
        q_table: &QTable<K>,
        state: &K,
        action_space: &Discrete,
        rng: &mut R,
    ) -> Result<usize>
    where
        K: Hashable,
        R: Rng + ?Sized,
    {
        let greedy = q_table.greedy_action(state).ok_or(Error::UnknownState)?;
        let action = match self.roll(rng) {
            Choice::Explore => action_space.sample(rng),
            Choice::Exploit => greedy,
        };
        Ok(action)
    }
}

impl EpsilonGreedy<Multiplicative> {
    /// Multiplicative decay from `epsilon` towards `min_epsilon` by factor `decay`
    pub fn multiplicative(epsilon: f64, min_epsilon: f64, decay: f64) -> Result<Self> {
        Ok(Self::new(Multiplicative::new(decay, epsilon, min_epsilon)?))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::Binomial;
    use statrs::statistics::Distribution;

    use super::*;
    use crate::decay::Constant;

    fn table(values: &[f64]) -> QTable<u8> {
        let mut table = QTable::new(values.len());
        table.insert(0, values.to_vec());
        table
    }

    #[test]
    fn exploit_picks_first_max() {
        let mut policy = EpsilonGreedy::multiplicative(0.0, 0.0, 1.0).unwrap();
        let q = table(&[3.0, 5.0, 5.0, 1.0]);
        let space = Discrete::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(policy.choose(&q, &0, &space, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn epsilon_decays_to_floor() {
        let mut policy = EpsilonGreedy::multiplicative(1.0, 0.1, 0.5).unwrap();
        let q = table(&[0.0, 0.0]);
        let space = Discrete::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for n in 0..10 {
            assert_eq!(policy.epsilon(), f64::max(0.5f64.powi(n), 0.1), "after {n} calls");
            policy.choose(&q, &0, &space, &mut rng).unwrap();
        }
    }

    #[test]
    fn epsilon_matches_repeated_decay() {
        let (initial, floor, decay) = (0.9, 0.005, 0.97);
        let mut policy = EpsilonGreedy::multiplicative(initial, floor, decay).unwrap();
        let q = table(&[0.0, 1.0]);
        let space = Discrete::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let mut expected = initial;
        for _ in 0..300 {
            policy.choose(&q, &0, &space, &mut rng).unwrap();
            expected = f64::max(expected * decay, floor);
            assert_eq!(policy.epsilon(), expected);
        }
        assert_eq!(policy.epsilon(), floor, "floor reached and held");
    }

    #[test]
    fn epsilon_follows_schedule() {
        let schedule = Multiplicative::new(0.97, 0.9, 0.005).unwrap();
        let mut policy = EpsilonGreedy::new(schedule.clone());
        let q = table(&[0.0, 1.0]);
        let space = Discrete::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        for n in 1..=150 {
            policy.choose(&q, &0, &space, &mut rng).unwrap();
            assert_eq!(policy.epsilon(), schedule.evaluate(n), "after {n} calls");
        }
    }

    #[test]
    fn reset_restores_initial() {
        let mut policy = EpsilonGreedy::multiplicative(0.8, 0.01, 0.5).unwrap();
        let q = table(&[0.0]);
        let space = Discrete::new(1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            policy.choose(&q, &0, &space, &mut rng).unwrap();
        }
        assert_eq!(policy.epsilon(), 0.01);
        policy.reset();
        assert_eq!(policy.epsilon(), 0.8);
    }

    #[test]
    fn unknown_state_is_an_error() {
        let mut policy = EpsilonGreedy::multiplicative(0.5, 0.1, 0.5).unwrap();
        let q = table(&[0.0, 0.0]);
        let space = Discrete::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            policy.choose(&q, &9, &space, &mut rng),
            Err(Error::UnknownState)
        ));
        assert_eq!(policy.epsilon(), 0.5, "no decay on failure");
    }

    #[test]
    fn exploration_rate() {
        const N: u64 = 10_000;
        let mut policy = EpsilonGreedy::new(Constant::new(0.5));
        let q = table(&[10.0, 0.0, 0.0, 0.0]);
        let space = Discrete::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let non_greedy = (0..N)
            .filter(|_| policy.choose(&q, &0, &space, &mut rng).unwrap() != 0)
            .count() as f64;

        // explore half the time, and 3 of 4 explored actions are non-greedy
        let dist = Binomial::new(0.375, N).unwrap();
        let (mean, sd) = (dist.mean().unwrap(), dist.std_dev().unwrap());
        assert!(
            (non_greedy - mean).abs() < 5.0 * sd,
            "non-greedy count {non_greedy} too far from {mean}"
        );
    }
}
