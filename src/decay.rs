use crate::{
    error::{Error, Result},
    util::check_interval,
};

/// An implementation of a decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: u32) -> f64;

    /// Advance `value` by a single time step
    fn next(&self, value: f64) -> f64;

    /// Value at `t = 0`
    fn initial(&self) -> f64 {
        self.evaluate(0)
    }
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: u32) -> f64 {
        self.value
    }

    fn next(&self, value: f64) -> f64 {
        value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Stepping with [`Decay::next`] multiplies by `r` and clamps at the floor, so the
/// value never increases and never drops below v<sub>f</sub>. [`Decay::evaluate`] applies
/// the same step `t` times rather than using `powf`, so it agrees bit for bit with a
/// value advanced one step at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multiplicative {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Multiplicative {
    /// All three parameters must lie in `[0,1]` and `vf` must not exceed `vi`
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        check_interval!(rate, 0.0, 1.0);
        check_interval!(vi, 0.0, 1.0);
        check_interval!(vf, 0.0, 1.0);
        if vf > vi {
            return Err(Error::InvalidConfig(format!(
                "floor {vf} is greater than initial value {vi}"
            )));
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Multiplicative {
    fn evaluate(&self, t: u32) -> f64 {
        let mut value = self.vi;
        for _ in 0..t {
            if value <= self.vf {
                break;
            }
            value = self.next(value);
        }
        value.max(self.vf)
    }

    fn next(&self, value: f64) -> f64 {
        (value * self.rate).max(self.vf)
    }
}
