//! Component configuration
//!
//! Components are described by [`ComponentRecord`]s, one per circuit element.
//! Records deserialize from any serde format, so an external loader can read
//! them from JSON or YAML parameter files:
//!
//! ```json
//! [
//!   { "symbol": "R1", "typ_value": 1000, "room_temp_tolerance": 1, "temp_coefficient": 50 },
//!   { "symbol": "R2", "typ_value": 2000, "room_temp_tolerance": [-2, 2],
//!     "temp_coefficient": 100, "max_temp_tolerance": [-3, 3],
//!     "max_operating_temperature": 85, "seed": 7 }
//! ]
//! ```
//!
//! # Builder DSL
//!
//! ```ignore
//! use tolerance_core::config::{ComponentBuilder, EvaluatorBuilder};
//!
//! let evaluator = EvaluatorBuilder::new()
//!     .component(ComponentBuilder::new("R1", 1000.0).tolerance(1.0).temp_coefficient(50.0))
//!     .component(ComponentBuilder::new("Vin", 5.0).tolerance(0.1).temp_coefficient(10.0))
//!     .seed(42)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{ComponentModel, ToleranceSpec};

pub mod builder;

pub use builder::{ComponentBuilder, EvaluatorBuilder};

/// Configuration record for one component.
///
/// Required fields are optional at the type level so that a missing one is
/// reported as [`ConfigError::MissingField`] with the record's position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub symbol: Option<String>,
    /// Nominal value
    pub typ_value: Option<f64>,
    /// Room-temperature tolerance in percent
    pub room_temp_tolerance: Option<ToleranceSpec>,
    /// ppm per °C
    pub temp_coefficient: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp_tolerance: Option<ToleranceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_operating_temperature: Option<f64>,
    /// Defaults to [`crate::model::DEFAULT_SIGMA`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    /// Seed for the component's generator; OS entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ComponentRecord {
    /// Validate the record and build its component, returning it with its symbol
    pub fn into_component(self, index: usize) -> Result<(String, ComponentModel), ConfigError> {
        let missing = |field| ConfigError::MissingField { index, field };

        let symbol = self.symbol.ok_or_else(|| missing("symbol"))?;
        let typ_value = self.typ_value.ok_or_else(|| missing("typ_value"))?;
        let room_tolerance = self
            .room_temp_tolerance
            .ok_or_else(|| missing("room_temp_tolerance"))?;
        let temp_coefficient = self
            .temp_coefficient
            .ok_or_else(|| missing("temp_coefficient"))?;

        let mut component = ComponentModel::new(typ_value, room_tolerance, temp_coefficient)?;
        if let Some(sigma) = self.sigma {
            component = component.with_sigma(sigma)?;
        }
        if let Some(tolerance) = self.max_temp_tolerance {
            component = component.with_max_tolerance(tolerance)?;
        }
        if let Some(temperature) = self.max_operating_temperature {
            component = component.with_max_operating_temperature(temperature);
        }
        if let Some(seed) = self.seed {
            component = component.with_seed(seed);
        }

        Ok((symbol, component))
    }
}
