//! Local sensitivity analysis
//!
//! Estimates how strongly the output of a formula responds to each component
//! by perturbing one nominal value at a time and taking a centered
//! difference:
//!
//! ```text
//! S = ((y(x·(1+δ)) − y(x·(1−δ))) / y(x)) / (2δ)
//! ```
//!
//! This is the relative sensitivity `(∂y/∂x)·(x/y)`, so a voltage divider
//! `Vin·R2/(R1+R2)` with equal resistors gives `S_R1 = −0.5`, `S_R2 = +0.5`
//! and `S_Vin = 1`.
//!
//! ```ignore
//! let report = evaluator.local_sensitivity(&divider, &["R1", "R2", "Vin"], &inputs, 25.0, 1.0)?;
//! assert!((report.get("R1").unwrap() + 0.5).abs() < 1e-3);
//! ```

mod sensitivity;

pub use sensitivity::DEFAULT_DELTA_PCT;
