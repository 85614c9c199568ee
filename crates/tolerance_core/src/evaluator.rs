//! Formula evaluation over a set of stochastic components
//!
//! The [`Evaluator`] owns one [`ComponentModel`] per symbol. Evaluating a
//! formula draws a fresh actual value for every referenced symbol and hands
//! the resulting mapping to the formula. Monte Carlo simulation
//! (`simulation.rs`) and sensitivity analysis (`analysis/`) are built on
//! these primitives.

use rustc_hash::FxHashMap;

use crate::config::ComponentRecord;
use crate::error::{ConfigError, EvaluationError, LookupError};
use crate::formula::{Formula, NamedValues};
use crate::model::{ComponentModel, VariationSamples};

/// Symbol -> component mapping plus the evaluation primitives
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    components: FxHashMap<String, ComponentModel>,
}

impl Evaluator {
    /// Build from configuration records.
    ///
    /// When two records share a symbol, the later one wins.
    pub fn from_records<I>(records: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ComponentRecord>,
    {
        let mut components: FxHashMap<String, ComponentModel> = FxHashMap::default();
        for (index, record) in records.into_iter().enumerate() {
            let (symbol, component) = record.into_component(index)?;
            if components.insert(symbol.clone(), component).is_some() {
                tracing::debug!(
                    symbol = %symbol,
                    index,
                    "Duplicate component symbol, later record wins"
                );
            }
        }
        Ok(Self { components })
    }

    /// Build from already constructed components (later duplicates win)
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = (S, ComponentModel)>,
        S: Into<String>,
    {
        let mut map: FxHashMap<String, ComponentModel> = FxHashMap::default();
        for (index, (symbol, component)) in components.into_iter().enumerate() {
            let symbol = symbol.into();
            if map.insert(symbol.clone(), component).is_some() {
                tracing::debug!(
                    symbol = %symbol,
                    index,
                    "Duplicate component symbol, later component wins"
                );
            }
        }
        Self { components: map }
    }

    /// Component for `symbol`, or `None` if there is no such component
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<&ComponentModel> {
        self.components.get(symbol)
    }

    pub fn lookup_mut(&mut self, symbol: &str) -> Option<&mut ComponentModel> {
        self.components.get_mut(symbol)
    }

    pub(crate) fn require(&self, symbol: &str) -> Result<&ComponentModel, LookupError> {
        self.lookup(symbol)
            .ok_or_else(|| LookupError::ComponentNotFound(symbol.to_string()))
    }

    pub(crate) fn require_mut(&mut self, symbol: &str) -> Result<&mut ComponentModel, LookupError> {
        self.components
            .get_mut(symbol)
            .ok_or_else(|| LookupError::ComponentNotFound(symbol.to_string()))
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.components.contains_key(symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All symbols, sorted
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.components.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    /// Randomized actual value of one component at `temperature`
    pub fn actual_value_of(&mut self, symbol: &str, temperature: f64) -> Result<f64, LookupError> {
        Ok(self.require_mut(symbol)?.actual_value(temperature))
    }

    /// Unperturbed nominal values of `symbols`
    pub fn nominal_values(&self, symbols: &[&str]) -> Result<NamedValues, LookupError> {
        let mut values = NamedValues::with_capacity(symbols.len());
        for &symbol in symbols {
            values.insert(symbol, self.require(symbol)?.nominal_value());
        }
        Ok(values)
    }

    /// Evaluate `formula` with a fresh random draw for every symbol.
    ///
    /// Formula errors are returned unchanged inside [`EvaluationError::Formula`].
    pub fn evaluate<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
    ) -> Result<f64, EvaluationError>
    where
        F: Formula + ?Sized,
    {
        self.evaluate_inner(formula, symbols, inputs, temperature, None)
    }

    /// Evaluate `formula` with every component's random variation fixed to
    /// `random_variation` percent. Only temperature drift is added, so repeated
    /// calls return the same output.
    pub fn evaluate_with_override<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
        random_variation: f64,
    ) -> Result<f64, EvaluationError>
    where
        F: Formula + ?Sized,
    {
        self.evaluate_inner(formula, symbols, inputs, temperature, Some(random_variation))
    }

    fn evaluate_inner<F>(
        &mut self,
        formula: &F,
        symbols: &[&str],
        inputs: &NamedValues,
        temperature: f64,
        random_variation: Option<f64>,
    ) -> Result<f64, EvaluationError>
    where
        F: Formula + ?Sized,
    {
        let mut values = NamedValues::with_capacity(symbols.len());
        for &symbol in symbols {
            let component = self.require_mut(symbol)?;
            values.insert(symbol, component.actual_value_with(temperature, random_variation));
        }
        Ok(formula.evaluate(&values, inputs)?)
    }

    /// Raw total-variation samples of one component at each temperature, for
    /// plotting error distributions
    pub fn variation_samples(
        &mut self,
        symbol: &str,
        temperatures: &[f64],
        count: usize,
    ) -> Result<Vec<VariationSamples>, LookupError> {
        let component = self.require_mut(symbol)?;
        Ok(temperatures
            .iter()
            .map(|&temperature| VariationSamples {
                symbol: symbol.to_string(),
                temperature,
                samples: component.variation_samples(temperature, count),
            })
            .collect())
    }

    /// Copy of the components named in `symbols`, each with a generator
    /// seeded from the original's stream. Repeated symbols are forked once.
    pub(crate) fn fork_subset(&mut self, symbols: &[&str]) -> Result<Evaluator, LookupError> {
        let mut components: FxHashMap<String, ComponentModel> = FxHashMap::default();
        for &symbol in symbols {
            if components.contains_key(symbol) {
                continue;
            }
            let fork = self.require_mut(symbol)?.fork();
            components.insert(symbol.to_string(), fork);
        }
        Ok(Evaluator { components })
    }
}
