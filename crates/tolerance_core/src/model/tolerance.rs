//! Tolerance ranges
//!
//! Datasheets state tolerances either as a symmetric bound (`±1%`) or as an
//! explicit asymmetric pair (`-2%/+5%`). Both shapes are accepted in
//! configuration and resolved once into a canonical [`ToleranceRange`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerance as written in a component record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToleranceSpec {
    /// `b` expands to `(-b, +b)`
    Symmetric(f64),
    /// Explicit `[min, max]` percent pair
    Range([f64; 2]),
}

impl From<f64> for ToleranceSpec {
    fn from(bound: f64) -> Self {
        ToleranceSpec::Symmetric(bound)
    }
}

impl From<(f64, f64)> for ToleranceSpec {
    fn from((min, max): (f64, f64)) -> Self {
        ToleranceSpec::Range([min, max])
    }
}

/// Canonical `(min, max)` tolerance in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRange {
    pub min: f64,
    pub max: f64,
}

impl ToleranceRange {
    /// Build a range, rejecting `min > max` and non-finite bounds
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidTolerance { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn symmetric(bound: f64) -> Result<Self, ConfigError> {
        Self::new(-bound, bound)
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Standard deviation when the half-range spans `sigma` deviations
    #[must_use]
    pub fn std_dev(&self, sigma: f64) -> f64 {
        self.width() / (2.0 * sigma)
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl TryFrom<ToleranceSpec> for ToleranceRange {
    type Error = ConfigError;

    fn try_from(spec: ToleranceSpec) -> Result<Self, Self::Error> {
        match spec {
            ToleranceSpec::Symmetric(bound) => ToleranceRange::symmetric(bound),
            ToleranceSpec::Range([min, max]) => ToleranceRange::new(min, max),
        }
    }
}
