//! One day's rate observations
//!
//! Pair code -> rate, where `None` (or NaN) means the provider had no quote
//! for that pair on that day.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::FxError;

/// Rates for a single day, keyed by pair code. Ordered so graph builds are
/// deterministic.
pub type RateSnapshot = BTreeMap<String, Option<f64>>;

/// Why an observation did not make it into the graph
#[derive(Debug, Clone, PartialEq)]
pub enum RateIssue {
    /// No quote for the day. Expected, not worth a warning.
    Missing,
    /// Zero, negative, or infinite rate; ln() is undefined or meaningless
    Invalid(f64),
    /// Pair code could not be split into two currencies
    BadPair(FxError),
}

impl RateIssue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RateIssue::Missing)
    }
}

impl fmt::Display for RateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateIssue::Missing => write!(f, "missing rate"),
            RateIssue::Invalid(rate) => write!(f, "invalid rate {}", rate),
            RateIssue::BadPair(err) => write!(f, "{}", err),
        }
    }
}

/// Accept a rate only if it can safely go through ln()
pub fn usable_rate(rate: Option<f64>) -> Result<f64, RateIssue> {
    match rate {
        None => Err(RateIssue::Missing),
        Some(r) if r.is_nan() => Err(RateIssue::Missing),
        Some(r) if r <= 0.0 || !r.is_finite() => Err(RateIssue::Invalid(r)),
        Some(r) => Ok(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_rate() {
        assert_eq!(usable_rate(Some(1.25)), Ok(1.25));
        assert_eq!(usable_rate(None), Err(RateIssue::Missing));
        assert_eq!(usable_rate(Some(f64::NAN)), Err(RateIssue::Missing));
        assert_eq!(usable_rate(Some(0.0)), Err(RateIssue::Invalid(0.0)));
        assert_eq!(usable_rate(Some(-2.0)), Err(RateIssue::Invalid(-2.0)));
        assert!(matches!(
            usable_rate(Some(f64::INFINITY)),
            Err(RateIssue::Invalid(_))
        ));
    }
}
