//! Stochastic model of a single component value
//!
//! A component has a nominal value, a manufacturing tolerance (optionally a
//! wider one at its maximum operating temperature) and a linear temperature
//! coefficient. Each model owns its own generator, so two components never
//! share a random stream and a fixed seed reproduces the same draws.

use rand::distr::{Distribution, StandardUniform, Uniform};
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_distr::Normal;

use crate::error::ConfigError;

use super::tolerance::{ToleranceRange, ToleranceSpec};

/// Temperature at which drift is zero (°C)
pub const REFERENCE_TEMPERATURE: f64 = 25.0;

/// Default number of standard deviations spanned by a tolerance half-range
pub const DEFAULT_SIGMA: f64 = 4.5;

/// Draws outside the tolerance range are redrawn at most this many times
/// before the last draw is clamped into the range.
const MAX_REJECTIONS: usize = 64;

/// Below this sigma a normal proposal misses the range too often, so draws
/// are proposed uniformly over the range and accepted by the Gaussian weight.
const UNIFORM_PROPOSAL_SIGMA: f64 = 2.0;

#[derive(Debug, Clone)]
enum Sampler {
    /// Zero-width range
    Fixed,
    /// Normal proposal, rejected outside the range
    Normal(Normal<f64>),
    /// Uniform proposal over the range, accepted with probability
    /// `exp(-(x - mean)² / 2σ²)`. Every point of the range sits within
    /// `sigma < 2` deviations of the mean, so acceptance stays above `exp(-2)`.
    Uniform {
        uniform: Uniform<f64>,
        mean: f64,
        std_dev: f64,
    },
}

/// A tolerance range with its sampling distribution resolved up front
#[derive(Debug, Clone)]
struct ToleranceBand {
    range: ToleranceRange,
    sampler: Sampler,
}

impl ToleranceBand {
    fn new(range: ToleranceRange, sigma: f64) -> Self {
        let mean = range.midpoint();
        let std_dev = range.std_dev(sigma);
        let sampler = if std_dev <= 0.0 {
            Sampler::Fixed
        } else if sigma < UNIFORM_PROPOSAL_SIGMA {
            match Uniform::new_inclusive(range.min, range.max) {
                Ok(uniform) => Sampler::Uniform {
                    uniform,
                    mean,
                    std_dev,
                },
                Err(_) => Sampler::Fixed,
            }
        } else {
            match Normal::new(mean, std_dev) {
                Ok(normal) => Sampler::Normal(normal),
                Err(_) => Sampler::Fixed,
            }
        };
        Self { range, sampler }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.sampler {
            Sampler::Fixed => self.range.midpoint(),
            Sampler::Normal(normal) => {
                let mut draw = normal.sample(rng);
                for _ in 0..MAX_REJECTIONS {
                    if self.range.contains(draw) {
                        return draw;
                    }
                    draw = normal.sample(rng);
                }
                draw.clamp(self.range.min, self.range.max)
            }
            Sampler::Uniform {
                uniform,
                mean,
                std_dev,
            } => loop {
                let draw = uniform.sample(rng);
                let z = (draw - mean) / std_dev;
                let accept: f64 = StandardUniform.sample(rng);
                if accept < (-0.5 * z * z).exp() {
                    return draw;
                }
            },
        }
    }
}

// Exact equality: the wider range is specified for one temperature only.
fn select_band<'a>(
    room: &'a ToleranceBand,
    max: Option<&'a ToleranceBand>,
    max_operating_temperature: Option<f64>,
    temperature: f64,
) -> &'a ToleranceBand {
    match (max, max_operating_temperature) {
        (Some(band), Some(max_temp)) if temperature == max_temp => band,
        _ => room,
    }
}

/// Stochastic model of one circuit element's value
#[derive(Debug, Clone)]
pub struct ComponentModel {
    nominal_value: f64,
    room: ToleranceBand,
    max: Option<ToleranceBand>,
    max_operating_temperature: Option<f64>,
    temp_coefficient: f64,
    sigma: f64,
    rng: SmallRng,
}

impl ComponentModel {
    /// Create a component seeded from OS entropy with the default sigma
    pub fn new(
        nominal_value: f64,
        room_tolerance: impl Into<ToleranceSpec>,
        temp_coefficient: f64,
    ) -> Result<Self, ConfigError> {
        let room = ToleranceRange::try_from(room_tolerance.into())?;
        Ok(Self {
            nominal_value,
            room: ToleranceBand::new(room, DEFAULT_SIGMA),
            max: None,
            max_operating_temperature: None,
            temp_coefficient,
            sigma: DEFAULT_SIGMA,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Replace the generator with one seeded from `seed`
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Set sigma, re-deriving both sampling distributions
    pub fn with_sigma(mut self, sigma: f64) -> Result<Self, ConfigError> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ConfigError::InvalidSigma(sigma));
        }
        self.sigma = sigma;
        self.room = ToleranceBand::new(self.room.range, sigma);
        self.max = self.max.map(|band| ToleranceBand::new(band.range, sigma));
        Ok(self)
    }

    /// Tolerance applied only at exactly the maximum operating temperature
    pub fn with_max_tolerance(
        mut self,
        tolerance: impl Into<ToleranceSpec>,
    ) -> Result<Self, ConfigError> {
        let range = ToleranceRange::try_from(tolerance.into())?;
        self.max = Some(ToleranceBand::new(range, self.sigma));
        Ok(self)
    }

    #[must_use]
    pub fn with_max_operating_temperature(mut self, temperature: f64) -> Self {
        self.max_operating_temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn nominal_value(&self) -> f64 {
        self.nominal_value
    }

    /// Only sensitivity analysis perturbs the nominal value, under a guard
    /// that restores it.
    pub(crate) fn set_nominal_value(&mut self, value: f64) {
        self.nominal_value = value;
    }

    #[must_use]
    pub fn room_tolerance(&self) -> ToleranceRange {
        self.room.range
    }

    #[must_use]
    pub fn max_tolerance(&self) -> Option<ToleranceRange> {
        self.max.as_ref().map(|band| band.range)
    }

    #[must_use]
    pub fn max_operating_temperature(&self) -> Option<f64> {
        self.max_operating_temperature
    }

    #[must_use]
    pub fn temp_coefficient(&self) -> f64 {
        self.temp_coefficient
    }

    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Tolerance range in effect at `temperature`.
    ///
    /// The max-operating range applies only when `temperature` equals
    /// `max_operating_temperature` exactly.
    #[must_use]
    pub fn active_tolerance(&self, temperature: f64) -> ToleranceRange {
        select_band(
            &self.room,
            self.max.as_ref(),
            self.max_operating_temperature,
            temperature,
        )
        .range
    }

    /// Random tolerance deviation in percent, drawn from a Gaussian truncated
    /// to the active range
    pub fn sample_random_variation(&mut self, temperature: f64) -> f64 {
        select_band(
            &self.room,
            self.max.as_ref(),
            self.max_operating_temperature,
            temperature,
        )
        .sample(&mut self.rng)
    }

    /// Deterministic drift in percent relative to 25 °C (ppm/°C -> %)
    #[must_use]
    pub fn temperature_drift(&self, temperature: f64) -> f64 {
        self.temp_coefficient * (temperature - REFERENCE_TEMPERATURE) / 10_000.0
    }

    /// Random (or overridden) variation plus drift, in percent
    pub fn total_variation(&mut self, temperature: f64, random_variation: Option<f64>) -> f64 {
        let random = match random_variation {
            Some(value) => value,
            None => self.sample_random_variation(temperature),
        };
        random + self.temperature_drift(temperature)
    }

    /// Value of one randomly drawn part at `temperature`
    pub fn actual_value(&mut self, temperature: f64) -> f64 {
        self.actual_value_with(temperature, None)
    }

    pub fn actual_value_with(&mut self, temperature: f64, random_variation: Option<f64>) -> f64 {
        let variation = self.total_variation(temperature, random_variation);
        self.nominal_value * (1.0 + variation / 100.0)
    }

    /// Draw `count` total variations (random + drift) at one temperature
    pub fn variation_samples(&mut self, temperature: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| self.total_variation(temperature, None))
            .collect()
    }

    /// Copy of this component with an independent generator seeded from this
    /// component's stream
    pub fn fork(&mut self) -> Self {
        let seed = self.rng.next_u64();
        Self {
            rng: SmallRng::seed_from_u64(seed),
            ..self.clone()
        }
    }
}
