//! Centered finite-difference sensitivity with scoped nominal perturbation

use crate::error::{EvaluationError, LookupError, SensitivityError};
use crate::evaluator::Evaluator;
use crate::formula::{Formula, NamedValues};
use crate::model::{SensitivityEntry, SensitivityReport};

/// Default perturbation, in percent of the nominal value
pub const DEFAULT_DELTA_PCT: f64 = 1.0;

/// Scoped perturbation of one component's nominal value.
///
/// The original value is restored when the guard is dropped, whether the
/// evaluations succeeded, returned an error or panicked.
struct PerturbationGuard<'a> {
    evaluator: &'a mut Evaluator,
    symbol: &'a str,
    original: f64,
}

impl<'a> PerturbationGuard<'a> {
    fn acquire(evaluator: &'a mut Evaluator, symbol: &'a str) -> Result<Self, LookupError> {
        let original = evaluator.require(symbol)?.nominal_value();
        Ok(Self {
            evaluator,
            symbol,
            original,
        })
    }

    /// Evaluate with this component at `original * factor` and every other
    /// component at its nominal value
    fn evaluate_scaled<F>(
        &mut self,
        factor: f64,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
    ) -> Result<f64, EvaluationError>
    where
        F: Formula + ?Sized,
    {
        self.evaluator
            .require_mut(self.symbol)?
            .set_nominal_value(self.original * factor);
        let values = self.evaluator.nominal_values(symbols)?;
        Ok(formula.evaluate(&values, inputs)?)
    }
}

impl Drop for PerturbationGuard<'_> {
    fn drop(&mut self) {
        if let Some(component) = self.evaluator.lookup_mut(self.symbol) {
            component.set_nominal_value(self.original);
        }
    }
}

impl Evaluator {
    /// Centered relative sensitivity of `formula` to each of `symbols`.
    ///
    /// Only nominal values are used; no random draws are made, and
    /// `temperature` does not affect the result. A symbol whose nominal value
    /// is zero, or any symbol when the base output is zero, reports +inf.
    /// Formula errors are returned after the perturbed component has been
    /// restored. `delta_pct` must be finite and greater than zero.
    pub fn local_sensitivity<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
        delta_pct: f64,
    ) -> Result<SensitivityReport, SensitivityError>
    where
        F: Formula + ?Sized,
    {
        if !(delta_pct.is_finite() && delta_pct > 0.0) {
            return Err(SensitivityError::InvalidDelta(delta_pct));
        }

        tracing::debug!(
            temperature,
            delta_pct,
            components = symbols.len(),
            "Starting local sensitivity analysis"
        );

        let base_values = self.nominal_values(symbols)?;
        let base_output = formula.evaluate(&base_values, inputs)?;
        let step = delta_pct / 100.0;

        let mut entries = Vec::with_capacity(symbols.len());
        for &symbol in symbols {
            let mut guard = PerturbationGuard::acquire(self, symbol)?;
            let plus = guard.evaluate_scaled(1.0 + step, formula, symbols, inputs)?;
            let minus = guard.evaluate_scaled(1.0 - step, formula, symbols, inputs)?;
            let original = guard.original;
            drop(guard);

            let sensitivity = if base_output != 0.0 && original != 0.0 {
                ((plus - minus) / base_output) / (2.0 * step)
            } else {
                f64::INFINITY
            };
            tracing::trace!(symbol, sensitivity, "Computed sensitivity");

            entries.push(SensitivityEntry {
                symbol: symbol.to_string(),
                sensitivity,
            });
        }

        Ok(SensitivityReport {
            base_output,
            delta_pct,
            entries,
        })
    }
}
