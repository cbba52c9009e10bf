//! Adherence ratio value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of expected occurrences that were completed.
///
/// Always within `[0.0, 1.0]`; out-of-range and NaN inputs are clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AdherenceRatio(f64);

impl AdherenceRatio {
    /// Nothing completed.
    pub const ZERO: Self = Self(0.0);

    /// Fully adherent; also the vacuous ratio when nothing was expected.
    pub const PERFECT: Self = Self(1.0);

    /// Creates a ratio, clamping to `[0.0, 1.0]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `completed / expected`, or `PERFECT` when nothing was expected.
    pub fn from_counts(completed: usize, expected: usize) -> Self {
        if expected == 0 {
            return Self::PERFECT;
        }
        Self::new(completed as f64 / expected as f64)
    }

    /// Unweighted mean; `PERFECT` for an empty input.
    pub fn mean(ratios: impl IntoIterator<Item = AdherenceRatio>) -> Self {
        let (sum, count) = ratios
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.0, count + 1));
        if count == 0 {
            return Self::PERFECT;
        }
        Self::new(sum / count as f64)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The ratio on a 0-100 scale.
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for AdherenceRatio {
    fn default() -> Self {
        Self::PERFECT
    }
}

impl From<f64> for AdherenceRatio {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<AdherenceRatio> for f64 {
    fn from(ratio: AdherenceRatio) -> Self {
        ratio.0
    }
}

impl fmt::Display for AdherenceRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_divides() {
        assert_eq!(AdherenceRatio::from_counts(2, 5).value(), 0.4);
    }

    #[test]
    fn from_counts_is_perfect_when_nothing_expected() {
        assert_eq!(AdherenceRatio::from_counts(0, 0), AdherenceRatio::PERFECT);
    }

    #[test]
    fn new_clamps_out_of_range() {
        assert_eq!(AdherenceRatio::new(1.7).value(), 1.0);
        assert_eq!(AdherenceRatio::new(-0.2).value(), 0.0);
        assert_eq!(AdherenceRatio::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn mean_is_unweighted() {
        let mean = AdherenceRatio::mean([AdherenceRatio::new(1.0), AdherenceRatio::new(0.5)]);
        assert_eq!(mean.value(), 0.75);
    }

    #[test]
    fn mean_of_nothing_is_perfect() {
        assert_eq!(AdherenceRatio::mean(Vec::new()), AdherenceRatio::PERFECT);
    }

    #[test]
    fn serializes_as_plain_float() {
        let json = serde_json::to_string(&AdherenceRatio::new(0.25)).unwrap();
        assert_eq!(json, "0.25");
        let back: AdherenceRatio = serde_json::from_str("3.0").unwrap();
        assert_eq!(back, AdherenceRatio::PERFECT);
    }

    #[test]
    fn displays_as_percentage() {
        assert_eq!(AdherenceRatio::new(0.4).to_string(), "40.0%");
    }
}
