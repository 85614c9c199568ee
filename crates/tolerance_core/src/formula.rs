//! Formula callback seam
//!
//! A formula maps component values (keyed by symbol) plus named extra inputs to
//! a single derived quantity. Any closure with the right signature is a
//! [`Formula`]:
//!
//! ```ignore
//! use tolerance_core::formula::{NamedValues, checked_div};
//! use tolerance_core::error::FormulaError;
//!
//! let divider = |values: &NamedValues, _inputs: &NamedValues| -> Result<f64, FormulaError> {
//!     let r1 = values.require("R1")?;
//!     let r2 = values.require("R2")?;
//!     let vin = values.require("Vin")?;
//!     Ok(vin * checked_div(r2, r1 + r2)?)
//! };
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

/// Name -> value mapping passed to formulas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedValues {
    values: FxHashMap<String, f64>,
}

impl NamedValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Like [`get`](Self::get) but fails with [`FormulaError::MissingValue`]
    pub fn require(&self, name: &str) -> Result<f64, FormulaError> {
        self.get(name)
            .ok_or_else(|| FormulaError::MissingValue(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for NamedValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for NamedValues {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A derived circuit quantity computed from component values
pub trait Formula {
    fn evaluate(&self, values: &NamedValues, inputs: &NamedValues) -> Result<f64, FormulaError>;
}

impl<F> Formula for F
where
    F: Fn(&NamedValues, &NamedValues) -> Result<f64, FormulaError>,
{
    fn evaluate(&self, values: &NamedValues, inputs: &NamedValues) -> Result<f64, FormulaError> {
        self(values, inputs)
    }
}

/// Divide, reporting a zero denominator as [`FormulaError::DivisionByZero`]
#[inline]
pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64, FormulaError> {
    if denominator == 0.0 {
        Err(FormulaError::DivisionByZero)
    } else {
        Ok(numerator / denominator)
    }
}
