//! Integration tests for the tolerance engine
//!
//! Tests are organized by topic:
//! - `component` - Sampling, drift and tolerance selection of a single component
//! - `evaluator` - Construction from records, lookups and formula evaluation
//! - `monte_carlo` - Monte Carlo statistics, skip policy and reproducibility
//! - `sensitivity` - Relative sensitivity values and nominal-value rollback

mod sensitivity;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::FormulaError;
use crate::formula::{NamedValues, checked_div};

/// Route library logs to the test harness. Set `RUST_LOG` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// `Vin * R2 / (R1 + R2)`, taking `Vin` from the components when present and
/// from the extra inputs otherwise
fn voltage_divider(values: &NamedValues, inputs: &NamedValues) -> Result<f64, FormulaError> {
    let r1 = values.require("R1")?;
    let r2 = values.require("R2")?;
    let vin = match values.get("Vin") {
        Some(vin) => vin,
        None => inputs.require("Vin")?,
    };
    Ok(vin * checked_div(r2, r1 + r2)?)
}
