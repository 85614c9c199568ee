//! Analysis outputs
//!
//! Report types returned by Monte Carlo simulation, sensitivity analysis and
//! the raw-sample primitive used by external plotting.

use serde::{Deserialize, Serialize};

use crate::simulation::DEFAULT_TRIALS;
use crate::stats::{SampleSummary, percent_error};

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

fn default_batch_size() -> usize {
    100
}

/// Configuration for a Monte Carlo run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of trials to attempt
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Trials per parallel batch; each batch gets its own component streams
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            batch_size: default_batch_size(),
        }
    }
}

impl MonteCarloConfig {
    #[must_use]
    pub fn with_trials(trials: usize) -> Self {
        Self {
            trials,
            ..Default::default()
        }
    }
}

/// Statistics of a Monte Carlo run relative to the nominal output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub nominal_output: f64,
    pub average_output: f64,
    pub min_output: f64,
    pub max_output: f64,
    pub std_dev_output: f64,
    pub percent_error_average: f64,
    pub percent_error_min: f64,
    pub percent_error_max: f64,
    /// Trials that produced an output
    pub num_simulations: usize,
    /// Trials attempted
    pub requested_simulations: usize,
    /// Trials dropped because the formula divided by zero
    pub skipped_simulations: usize,
}

impl MonteCarloReport {
    /// Build a report from collected outputs, or `None` if there are none
    #[must_use]
    pub fn from_outputs(nominal_output: f64, outputs: &[f64], requested: usize) -> Option<Self> {
        let summary = SampleSummary::from_samples(outputs)?;
        Some(Self {
            nominal_output,
            average_output: summary.mean,
            min_output: summary.min,
            max_output: summary.max,
            std_dev_output: summary.std_dev,
            percent_error_average: percent_error(summary.mean, nominal_output),
            percent_error_min: percent_error(summary.min, nominal_output),
            percent_error_max: percent_error(summary.max, nominal_output),
            num_simulations: summary.count,
            requested_simulations: requested,
            skipped_simulations: requested.saturating_sub(summary.count),
        })
    }

    /// Fraction of requested trials that produced an output
    #[must_use]
    pub fn valid_fraction(&self) -> f64 {
        if self.requested_simulations == 0 {
            0.0
        } else {
            self.num_simulations as f64 / self.requested_simulations as f64
        }
    }
}

/// Relative sensitivity of the output to one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub symbol: String,
    /// `(dy/y) / (dx/x)`; +inf when the base output or nominal value is zero
    pub sensitivity: f64,
}

/// Per-component sensitivities in the order the symbols were requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub base_output: f64,
    pub delta_pct: f64,
    pub entries: Vec<SensitivityEntry>,
}

impl SensitivityReport {
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.sensitivity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.symbol.as_str(), e.sensitivity))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the largest absolute finite sensitivity
    #[must_use]
    pub fn dominant(&self) -> Option<&SensitivityEntry> {
        self.entries
            .iter()
            .filter(|e| e.sensitivity.is_finite())
            .max_by(|a, b| a.sensitivity.abs().total_cmp(&b.sensitivity.abs()))
    }
}

/// Raw variation samples of one component at one temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationSamples {
    pub symbol: String,
    pub temperature: f64,
    /// Total variation (random + drift) in percent
    pub samples: Vec<f64>,
}

impl VariationSamples {
    #[must_use]
    pub fn summary(&self) -> Option<SampleSummary> {
        SampleSummary::from_samples(&self.samples)
    }
}
