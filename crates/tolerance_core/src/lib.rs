//! Component tolerance propagation library
//!
//! This crate estimates how manufacturing tolerance and temperature drift of
//! individual component values propagate into a derived circuit quantity.
//! It supports:
//! - Per-component stochastic models (symmetric or asymmetric tolerance,
//!   separate tolerance at maximum operating temperature, ppm/°C drift)
//! - Evaluation of arbitrary user formulas against randomized values
//! - Monte Carlo uncertainty simulation (sequential or parallel)
//! - Local relative sensitivity analysis by centered finite differences
//!
//! # Builder DSL
//!
//! ```ignore
//! use tolerance_core::config::{ComponentBuilder, EvaluatorBuilder};
//! use tolerance_core::formula::{NamedValues, checked_div};
//!
//! let mut evaluator = EvaluatorBuilder::new()
//!     .component(ComponentBuilder::new("R1", 1000.0).tolerance(1.0).temp_coefficient(50.0))
//!     .component(ComponentBuilder::new("R2", 1000.0).tolerance(1.0).temp_coefficient(50.0))
//!     .component(ComponentBuilder::new("Vin", 5.0).tolerance(0.1).temp_coefficient(10.0))
//!     .seed(42)
//!     .build()?;
//!
//! let divider = |v: &NamedValues, _: &NamedValues| {
//!     Ok(v.require("Vin")? * checked_div(v.require("R2")?, v.require("R1")? + v.require("R2")?)?)
//! };
//!
//! let report = evaluator.run_monte_carlo(&divider, &["R1", "R2", "Vin"], &NamedValues::new(), 25.0, 10_000)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod simulation;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ComponentBuilder, ComponentRecord, EvaluatorBuilder};
pub use evaluator::Evaluator;
pub use formula::{Formula, NamedValues, checked_div};
pub use model::{ComponentModel, MonteCarloConfig, MonteCarloReport, SensitivityReport};
