use crate::{
    algo::tabular::Hashable,
    error::{Error, Result},
};

/// Deterministic mapping from an observation to a Q-table key
///
/// A Q-table is only meaningful under the discretizer that produced its keys, so keep a
/// single discretizer for the lifetime of a table.
pub trait Discretizer<O> {
    type Key: Hashable;

    fn key(&self, obs: &O) -> Result<Self::Key>;

    /// Discretize a joint observation, one key per agent
    fn keys(&self, joint: &[O]) -> Result<Vec<Self::Key>> {
        joint.iter().map(|obs| self.key(obs)).collect()
    }
}

/// Passes already discrete observations through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<O: Hashable> Discretizer<O> for Identity {
    type Key = O;

    fn key(&self, obs: &O) -> Result<O> {
        Ok(*obs)
    }
}

/// Discretizer for two-component observations in the unit square, such as the agent
/// coordinates of the Switch gridworld
///
/// key = floor(2 * obs<sub>0</sub>) * 7 + round(6 * obs<sub>1</sub>)
///
/// Rounding is half-to-even. Components past the second are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchDiscretizer;

impl SwitchDiscretizer {
    const ROWS: f64 = 2.0;
    const COLS: f64 = 6.0;
    const STRIDE: i64 = 7;
}

impl Discretizer<Vec<f64>> for SwitchDiscretizer {
    type Key = i64;

    fn key(&self, obs: &Vec<f64>) -> Result<i64> {
        let &[row, col, ..] = obs.as_slice() else {
            return Err(Error::ObservationShape {
                expected: 2,
                found: obs.len(),
            });
        };
        let overflow = |component: usize| Error::ObservationValue {
            component,
            value: obs[component],
        };
        let row_cell = cell(row, (row * Self::ROWS).floor()).ok_or_else(|| overflow(0))?;
        let col_cell = cell(col, (col * Self::COLS).round_ties_even()).ok_or_else(|| overflow(1))?;
        row_cell
            .checked_mul(Self::STRIDE)
            .ok_or_else(|| overflow(0))?
            .checked_add(col_cell)
            .ok_or_else(|| overflow(1))
    }
}

/// Integer cell of a scaled component, `None` for non-finite values or values an `i64`
/// cannot hold
fn cell(value: f64, scaled: f64) -> Option<i64> {
    // 2^63, exactly representable; the cast saturates at and past it
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.is_finite() && scaled.is_finite() && scaled.abs() < LIMIT).then_some(scaled as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_keys() {
        let d = SwitchDiscretizer;
        assert_eq!(d.key(&vec![0.0, 0.0]).unwrap(), 0);
        assert_eq!(d.key(&vec![0.5, 0.5]).unwrap(), 7 + 3);
        assert_eq!(d.key(&vec![0.99, 1.0]).unwrap(), 7 + 6);
        assert_eq!(d.key(&vec![0.25, 0.25]).unwrap(), 2, "1.5 rounds to even");
        assert_eq!(d.key(&vec![0.1, 0.0, 9.0]).unwrap(), 0, "extra components ignored");
    }

    #[test]
    fn switch_keys_are_deterministic() {
        let d = SwitchDiscretizer;
        let obs = vec![0.37, 0.81];
        assert_eq!(d.key(&obs).unwrap(), d.key(&obs.clone()).unwrap());
    }

    #[test]
    fn short_observation_rejected() {
        assert!(matches!(
            SwitchDiscretizer.key(&vec![0.5]),
            Err(Error::ObservationShape {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn non_finite_observation_rejected() {
        let d = SwitchDiscretizer;
        for obs in [
            vec![f64::NAN, 0.5],
            vec![0.5, f64::NAN],
            vec![f64::INFINITY, 0.0],
            vec![0.0, f64::NEG_INFINITY],
        ] {
            assert!(
                matches!(d.key(&obs), Err(Error::ObservationValue { .. })),
                "{obs:?} should be rejected"
            );
        }
    }

    #[test]
    fn huge_observation_rejected() {
        let d = SwitchDiscretizer;
        assert!(matches!(
            d.key(&vec![1e300, 0.0]),
            Err(Error::ObservationValue { component: 0, .. })
        ));
        assert!(matches!(
            d.key(&vec![0.0, -1e300]),
            Err(Error::ObservationValue { component: 1, .. })
        ));
        // fits an i64 on its own but overflows once scaled by the row stride
        assert!(matches!(
            d.key(&vec![1e18, 0.0]),
            Err(Error::ObservationValue { component: 0, .. })
        ));
        assert_eq!(d.key(&vec![-1.0, 0.0]).unwrap(), -14, "negative rows are fine");
    }

    #[test]
    fn joint_keys() {
        let keys = SwitchDiscretizer
            .keys(&[vec![0.0, 0.0], vec![0.5, 1.0]])
            .unwrap();
        assert_eq!(keys, vec![0, 13]);
        assert_eq!(Identity.keys(&[3u8, 4]).unwrap(), vec![3, 4]);
    }
}
