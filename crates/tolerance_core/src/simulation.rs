//! Monte Carlo uncertainty simulation
//!
//! Each trial draws a fresh actual value for every referenced component and
//! evaluates the formula. Trials whose formula divides by zero are dropped;
//! any other failure aborts the run.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{EvaluationError, SimulationError};
use crate::evaluator::Evaluator;
use crate::formula::{Formula, NamedValues};
use crate::model::MonteCarloReport;

/// Trial count used when callers have no preference
pub const DEFAULT_TRIALS: usize = 10_000;

impl Evaluator {
    /// Run `trials` randomized evaluations and summarize the outputs.
    ///
    /// The nominal output is computed from unperturbed nominal values. The
    /// report's `num_simulations` counts only trials that produced an output.
    pub fn run_monte_carlo<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
        trials: usize,
    ) -> Result<MonteCarloReport, SimulationError>
    where
        F: Formula + ?Sized,
    {
        tracing::debug!(
            trials,
            temperature,
            components = symbols.len(),
            "Starting Monte Carlo simulation"
        );

        let nominal_output = self.nominal_output(formula, symbols, inputs)?;
        let outputs = collect_outputs(self, formula, symbols, inputs, temperature, trials)?;

        summarize(nominal_output, &outputs, trials)
    }

    /// Parallel variant of [`run_monte_carlo`](Self::run_monte_carlo).
    ///
    /// Trials are split into batches of `config.batch_size`. Every batch works
    /// on forked copies of the referenced components, so workers never share a
    /// generator. Fork seeds are drawn from the components' own streams in
    /// batch order, which keeps runs reproducible for seeded components.
    #[cfg(feature = "parallel")]
    pub fn run_monte_carlo_parallel<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
        config: &crate::model::MonteCarloConfig,
    ) -> Result<MonteCarloReport, SimulationError>
    where
        F: Formula + Sync + ?Sized,
    {
        let trials = config.trials;
        let batch_size = config.batch_size.max(1);
        let num_batches = trials.div_ceil(batch_size);

        tracing::debug!(
            trials,
            batch_size,
            temperature,
            "Starting parallel Monte Carlo simulation"
        );

        let nominal_output = self.nominal_output(formula, symbols, inputs)?;

        let batches = (0..num_batches)
            .map(|i| -> Result<(Evaluator, usize), SimulationError> {
                let size = if i == num_batches - 1 {
                    trials - i * batch_size
                } else {
                    batch_size
                };
                Ok((self.fork_subset(symbols)?, size))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outputs: Vec<Vec<f64>> = batches
            .into_par_iter()
            .map(|(mut batch, size)| {
                collect_outputs(&mut batch, formula, symbols, inputs, temperature, size)
            })
            .collect::<Result<_, _>>()?;

        let outputs: Vec<f64> = outputs.into_iter().flatten().collect();
        summarize(nominal_output, &outputs, trials)
    }

    fn nominal_output<F>(
        &self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
    ) -> Result<f64, SimulationError>
    where
        F: Formula + ?Sized,
    {
        let nominal_values = self.nominal_values(symbols)?;
        Ok(formula.evaluate(&nominal_values, inputs)?)
    }
}

/// Evaluate `trials` times, dropping trials that divide by zero
fn collect_outputs<F>(
    evaluator: &mut Evaluator,
    formula: &F,
    symbols: &[&str],
    inputs: &NamedValues,
    temperature: f64,
    trials: usize,
) -> Result<Vec<f64>, SimulationError>
where
    F: Formula + ?Sized,
{
    let mut outputs = Vec::with_capacity(trials);
    for trial in 0..trials {
        match evaluator.evaluate(formula, symbols, inputs, temperature) {
            Ok(output) => outputs.push(output),
            Err(EvaluationError::Formula(e)) if e.is_skippable() => {
                tracing::trace!(trial, error = %e, "Skipping trial");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(outputs)
}

fn summarize(
    nominal_output: f64,
    outputs: &[f64],
    requested: usize,
) -> Result<MonteCarloReport, SimulationError> {
    let Some(report) = MonteCarloReport::from_outputs(nominal_output, outputs, requested) else {
        tracing::warn!(requested, "Monte Carlo simulation produced no valid trials");
        return Err(SimulationError::Exhausted { requested });
    };

    if report.skipped_simulations > 0 {
        tracing::warn!(
            skipped = report.skipped_simulations,
            valid = report.num_simulations,
            "Monte Carlo trials skipped on division by zero"
        );
    }
    tracing::debug!(
        valid = report.num_simulations,
        mean = report.average_output,
        std_dev = report.std_dev_output,
        "Monte Carlo simulation finished"
    );

    Ok(report)
}
