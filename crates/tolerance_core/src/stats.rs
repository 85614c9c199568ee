//! Summary statistics over simulation outputs

use serde::{Deserialize, Serialize};

/// Mean, extremes and population standard deviation of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by `count`, no Bessel correction)
    pub std_dev: f64,
}

impl SampleSummary {
    /// Summarize `samples`, or `None` when there are none
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }
}

/// Percent deviation of `value` from `reference`, +inf when `reference` is zero
#[must_use]
pub fn percent_error(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        f64::INFINITY
    } else {
        (value - reference) / reference * 100.0
    }
}
