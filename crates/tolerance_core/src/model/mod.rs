mod component;
mod results;
mod tolerance;

pub use component::{ComponentModel, DEFAULT_SIGMA, REFERENCE_TEMPERATURE};
pub use results::{
    MonteCarloConfig, MonteCarloReport, SensitivityEntry, SensitivityReport, VariationSamples,
};
pub use tolerance::{ToleranceRange, ToleranceSpec};
