/// Checks that a numerical value is in the closed interval `[a,b]`, returning early
/// with [`Error::OutOfInterval`](crate::error::Error::OutOfInterval) if not
///
/// ### Example
/// ```ignore
/// let gamma = 2.0;
/// check_interval!(gamma, 0.0, 1.0);
/// ```
/// This returns the error "Invalid value for \`gamma\`: 2. Must be in the interval \[0, 1\]."
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::OutOfInterval {
                name: stringify!($var),
                value: $var as f64,
                low: $a,
                high: $b,
            });
        }
    };
}

pub(crate) use check_interval;

#[cfg(test)]
mod tests {
    use crate::error::{Error, Result};

    fn unit(value: f64) -> Result<f64> {
        check_interval!(value, 0.0, 1.0);
        Ok(value)
    }

    #[test]
    fn check_interval_bounds() {
        assert!(unit(0.0).is_ok(), "lower bound is inclusive");
        assert!(unit(1.0).is_ok(), "upper bound is inclusive");
        assert!(
            matches!(unit(1.5), Err(Error::OutOfInterval { name: "value", .. })),
            "names the offending variable"
        );
        assert!(unit(f64::NAN).is_err(), "NaN is rejected");
    }
}
