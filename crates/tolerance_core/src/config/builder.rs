//! Evaluator Builder
//!
//! Fluent API for declaring components without writing records by hand.
//!
//! # Example
//!
//! ```ignore
//! use tolerance_core::config::{ComponentBuilder, EvaluatorBuilder};
//!
//! let mut evaluator = EvaluatorBuilder::new()
//!     .component(ComponentBuilder::new("R1", 1000.0).tolerance(1.0).temp_coefficient(50.0))
//!     .component(ComponentBuilder::new("R2", 1000.0).tolerance(1.0).temp_coefficient(50.0))
//!     .component(
//!         ComponentBuilder::new("Vin", 5.0)
//!             .tolerance_range(-0.2, 0.1)
//!             .max_temperature(85.0, 0.5),
//!     )
//!     .seed(42)
//!     .build()?;
//! ```

use super::ComponentRecord;
use crate::error::ConfigError;
use crate::evaluator::Evaluator;
use crate::model::ToleranceSpec;

/// Builder for a single component record
#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    record: ComponentRecord,
}

impl ComponentBuilder {
    /// Start a component with zero tolerance and zero temperature coefficient
    #[must_use]
    pub fn new(symbol: impl Into<String>, typ_value: f64) -> Self {
        Self {
            record: ComponentRecord {
                symbol: Some(symbol.into()),
                typ_value: Some(typ_value),
                room_temp_tolerance: Some(ToleranceSpec::Symmetric(0.0)),
                temp_coefficient: Some(0.0),
                ..Default::default()
            },
        }
    }

    /// Symmetric room-temperature tolerance, `±bound` percent
    #[must_use]
    pub fn tolerance(mut self, bound: f64) -> Self {
        self.record.room_temp_tolerance = Some(ToleranceSpec::Symmetric(bound));
        self
    }

    /// Asymmetric room-temperature tolerance in percent
    #[must_use]
    pub fn tolerance_range(mut self, min: f64, max: f64) -> Self {
        self.record.room_temp_tolerance = Some(ToleranceSpec::Range([min, max]));
        self
    }

    /// Temperature coefficient in ppm/°C
    #[must_use]
    pub fn temp_coefficient(mut self, ppm_per_degree: f64) -> Self {
        self.record.temp_coefficient = Some(ppm_per_degree);
        self
    }

    /// Symmetric tolerance that applies at the maximum operating temperature
    #[must_use]
    pub fn max_temperature(mut self, temperature: f64, bound: f64) -> Self {
        self.record.max_operating_temperature = Some(temperature);
        self.record.max_temp_tolerance = Some(ToleranceSpec::Symmetric(bound));
        self
    }

    /// Asymmetric variant of [`max_temperature`](Self::max_temperature)
    #[must_use]
    pub fn max_temperature_range(mut self, temperature: f64, min: f64, max: f64) -> Self {
        self.record.max_operating_temperature = Some(temperature);
        self.record.max_temp_tolerance = Some(ToleranceSpec::Range([min, max]));
        self
    }

    #[must_use]
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.record.sigma = Some(sigma);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.record.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn into_record(self) -> ComponentRecord {
        self.record
    }
}

impl From<ComponentBuilder> for ComponentRecord {
    fn from(builder: ComponentBuilder) -> Self {
        builder.record
    }
}

/// Builder for an [`Evaluator`]
#[derive(Debug, Clone, Default)]
pub struct EvaluatorBuilder {
    records: Vec<ComponentRecord>,
    base_seed: Option<u64>,
}

impl EvaluatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn component(mut self, component: impl Into<ComponentRecord>) -> Self {
        self.records.push(component.into());
        self
    }

    #[must_use]
    pub fn components<I>(mut self, components: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ComponentRecord>,
    {
        self.records.extend(components.into_iter().map(Into::into));
        self
    }

    /// Seed every component that has no explicit seed.
    ///
    /// The component at position `i` gets `base_seed + i`, so each one still
    /// draws from its own stream.
    #[must_use]
    pub fn seed(mut self, base_seed: u64) -> Self {
        self.base_seed = Some(base_seed);
        self
    }

    pub fn build(self) -> Result<Evaluator, ConfigError> {
        let base_seed = self.base_seed;
        let records = self
            .records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                if record.seed.is_none()
                    && let Some(base) = base_seed
                {
                    record.seed = Some(base.wrapping_add(i as u64));
                }
                record
            });
        Evaluator::from_records(records)
    }
}
