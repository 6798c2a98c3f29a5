//! Order-statistic primitives over glucose values.
//!
//! All quantiles use the same continuous estimator: linear interpolation
//! between the two order statistics bracketing rank `(n - 1) * p`. The median
//! is the 0.5 quantile under that convention, so the five percentiles of a
//! [`QuantileSummary`] are always mutually ordered.

use serde::{Deserialize, Serialize};

/// Copy of `values` sorted ascending.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of already-sorted values.
///
/// `p` is clamped to `[0, 1]`. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = (sorted.len() - 1) as f64 * p;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let fraction = rank - lo as f64;
    // rounding may otherwise overshoot the upper order statistic
    Some((sorted[lo] + fraction * (sorted[hi] - sorted[lo])).min(sorted[hi]))
}

/// Quantile of unsorted values.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted_values(values), p)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// `(min, max)` of the values, or `None` when empty.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Box-and-whisker summary of one group of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileSummary {
    pub min: f64,
    pub tenth_quantile: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub ninetieth_quantile: f64,
    pub max: f64,
}

impl QuantileSummary {
    /// Summarise `values`, sorting them once. `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_values(values);
        let q = |p: f64| quantile_sorted(&sorted, p);
        Some(Self {
            min: *sorted.first()?,
            tenth_quantile: q(0.1)?,
            first_quartile: q(0.25)?,
            median: q(0.5)?,
            third_quartile: q(0.75)?,
            ninetieth_quantile: q(0.9)?,
            max: *sorted.last()?,
        })
    }

    /// Values from min to max, in rendering order.
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.min,
            self.tenth_quantile,
            self.first_quartile,
            self.median,
            self.third_quartile,
            self.ninetieth_quantile,
            self.max,
        ]
    }
}
