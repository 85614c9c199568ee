//! Tests for local sensitivity analysis
//!
//! These tests verify:
//! - Sensitivities match the analytic relative sensitivities
//! - Nominal values are restored bit-for-bit on every exit path

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::analysis::DEFAULT_DELTA_PCT;
use crate::config::{ComponentBuilder, EvaluatorBuilder};
use crate::error::{FormulaError, LookupError, SensitivityError};
use crate::evaluator::Evaluator;
use crate::formula::NamedValues;

use super::{init_tracing, voltage_divider};

const SYMBOLS: [&str; 3] = ["R1", "R2", "Vin"];

fn divider_evaluator(r1: f64, r2: f64, vin: f64) -> Evaluator {
    EvaluatorBuilder::new()
        .component(ComponentBuilder::new("R1", r1).tolerance(1.0).temp_coefficient(50.0))
        .component(ComponentBuilder::new("R2", r2).tolerance(1.0).temp_coefficient(50.0))
        .component(ComponentBuilder::new("Vin", vin).tolerance(0.1).temp_coefficient(10.0))
        .seed(1)
        .build()
        .unwrap()
}

fn nominal_bits(evaluator: &Evaluator) -> Vec<u64> {
    SYMBOLS
        .iter()
        .map(|s| evaluator.lookup(s).unwrap().nominal_value().to_bits())
        .collect()
}

/// Test the voltage divider against the analytic relative sensitivities
#[test]
fn test_voltage_divider_sensitivity() {
    init_tracing();
    let mut evaluator = divider_evaluator(1000.0, 1000.0, 5.0);

    let report = evaluator
        .local_sensitivity(
            &voltage_divider,
            &SYMBOLS,
            &NamedValues::new(),
            25.0,
            DEFAULT_DELTA_PCT,
        )
        .unwrap();

    assert_eq!(report.base_output, 2.5);
    assert_eq!(report.len(), 3);
    assert!((report.get("R1").unwrap() + 0.5).abs() < 1e-3);
    assert!((report.get("R2").unwrap() - 0.5).abs() < 1e-3);
    assert!((report.get("Vin").unwrap() - 1.0).abs() < 1e-9);

    // Entries keep the requested order
    let order: Vec<&str> = report.iter().map(|(s, _)| s).collect();
    assert_eq!(order, SYMBOLS);
}

/// Test an unbalanced divider: S_R1 = -R1/(R1+R2), S_R2 = R1/(R1+R2)
#[test]
fn test_unbalanced_divider_sensitivity() {
    let (r1, r2) = (1000.0, 3000.0);
    let mut evaluator = divider_evaluator(r1, r2, 12.0);

    let report = evaluator
        .local_sensitivity(&voltage_divider, &SYMBOLS, &NamedValues::new(), 25.0, 0.5)
        .unwrap();

    assert!((report.get("R1").unwrap() - (-r1 / (r1 + r2))).abs() < 1e-3);
    assert!((report.get("R2").unwrap() - r1 / (r1 + r2)).abs() < 1e-3);
    assert_eq!(report.dominant().map(|e| e.symbol.as_str()), Some("Vin"));
}

/// Test that the estimate converges as the perturbation shrinks
#[test]
fn test_sensitivity_converges_with_smaller_delta() {
    let mut evaluator = EvaluatorBuilder::new()
        .component(ComponentBuilder::new("x", 2.0))
        .build()
        .unwrap();
    let cube = |v: &NamedValues, _: &NamedValues| -> Result<f64, FormulaError> {
        Ok(v.require("x")?.powi(3))
    };

    let error_at = |evaluator: &mut Evaluator, delta: f64| {
        let report = evaluator
            .local_sensitivity(&cube, &["x"], &NamedValues::new(), 25.0, delta)
            .unwrap();
        (report.get("x").unwrap() - 3.0).abs()
    };

    let coarse = error_at(&mut evaluator, 5.0);
    let fine = error_at(&mut evaluator, 0.1);
    assert!(fine < coarse);
    assert!(fine < 1e-4);
}

/// Test that nominal values are bit-identical after a successful analysis
#[test]
fn test_rollback_after_success() {
    let mut evaluator = divider_evaluator(1234.5678, 987.654321, 3.3);
    let before = nominal_bits(&evaluator);

    evaluator
        .local_sensitivity(&voltage_divider, &SYMBOLS, &NamedValues::new(), 25.0, 7.3)
        .unwrap();

    assert_eq!(nominal_bits(&evaluator), before);
}

/// Test that nominal values are restored when the formula fails mid-analysis
#[test]
fn test_rollback_after_formula_error() {
    let mut evaluator = divider_evaluator(1000.0, 2000.0, 5.0);
    let before = nominal_bits(&evaluator);

    let fails_on_high_r2 = |v: &NamedValues, i: &NamedValues| -> Result<f64, FormulaError> {
        if v.require("R2")? > 2000.0 {
            return Err(FormulaError::Domain("R2 above rating".into()));
        }
        voltage_divider(v, i)
    };

    let err = evaluator
        .local_sensitivity(&fails_on_high_r2, &SYMBOLS, &NamedValues::new(), 25.0, 1.0)
        .unwrap_err();

    assert_eq!(
        err,
        SensitivityError::Formula(FormulaError::Domain("R2 above rating".into()))
    );
    assert_eq!(nominal_bits(&evaluator), before);
}

/// Test that nominal values are restored even if the formula panics
#[test]
fn test_rollback_after_panic() {
    let mut evaluator = divider_evaluator(1000.0, 2000.0, 5.0);
    let before = nominal_bits(&evaluator);

    let panics_on_low_r1 = |v: &NamedValues, i: &NamedValues| -> Result<f64, FormulaError> {
        assert!(v.require("R1")? >= 1000.0, "R1 below nominal");
        voltage_divider(v, i)
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        evaluator.local_sensitivity(&panics_on_low_r1, &SYMBOLS, &NamedValues::new(), 25.0, 1.0)
    }));

    assert!(result.is_err());
    assert_eq!(nominal_bits(&evaluator), before);
}

/// Test that a zero base output reports +inf for every symbol
#[test]
fn test_zero_base_output_is_infinite() {
    let mut evaluator = divider_evaluator(1000.0, 1000.0, 5.0);
    let difference = |v: &NamedValues, _: &NamedValues| -> Result<f64, FormulaError> {
        Ok(v.require("R1")? - v.require("R2")?)
    };

    let report = evaluator
        .local_sensitivity(&difference, &["R1", "R2"], &NamedValues::new(), 25.0, 1.0)
        .unwrap();

    assert_eq!(report.get("R1"), Some(f64::INFINITY));
    assert_eq!(report.get("R2"), Some(f64::INFINITY));
    assert!(report.dominant().is_none());
}

/// Test that an unknown symbol is a lookup error and nothing is mutated
#[test]
fn test_unknown_symbol_is_lookup_error() {
    let mut evaluator = divider_evaluator(1000.0, 1000.0, 5.0);
    let before = nominal_bits(&evaluator);

    let err = evaluator
        .local_sensitivity(
            &voltage_divider,
            &["R1", "R2", "R7"],
            &NamedValues::from([("Vin", 5.0)]),
            25.0,
            1.0,
        )
        .unwrap_err();

    assert_eq!(
        err,
        SensitivityError::Lookup(LookupError::ComponentNotFound("R7".into()))
    );
    assert_eq!(nominal_bits(&evaluator), before);
}

/// Test that analysis leaves the random streams untouched
#[test]
fn test_sensitivity_consumes_no_randomness() {
    let mut analyzed = divider_evaluator(1000.0, 1000.0, 5.0);
    let mut untouched = divider_evaluator(1000.0, 1000.0, 5.0);

    analyzed
        .local_sensitivity(&voltage_divider, &SYMBOLS, &NamedValues::new(), 25.0, 1.0)
        .unwrap();

    for symbol in SYMBOLS {
        assert_eq!(
            analyzed.actual_value_of(symbol, 25.0).unwrap(),
            untouched.actual_value_of(symbol, 25.0).unwrap()
        );
    }
}

/// Test that a zero, negative or non-finite step is rejected before any
/// component is touched
#[test]
fn test_invalid_delta_rejected() {
    let mut evaluator = divider_evaluator(1000.0, 1000.0, 5.0);
    let before = nominal_bits(&evaluator);

    for delta in [0.0, -1.0, f64::INFINITY] {
        let err = evaluator
            .local_sensitivity(&voltage_divider, &SYMBOLS, &NamedValues::new(), 25.0, delta)
            .unwrap_err();
        assert_eq!(err, SensitivityError::InvalidDelta(delta));
    }

    let err = evaluator
        .local_sensitivity(&voltage_divider, &SYMBOLS, &NamedValues::new(), 25.0, f64::NAN)
        .unwrap_err();
    assert!(matches!(err, SensitivityError::InvalidDelta(d) if d.is_nan()));

    assert_eq!(nominal_bits(&evaluator), before);
}
