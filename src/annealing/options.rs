//! # SaConfig
//!
//! The `SaConfig` struct represents the configuration of a simulated annealing
//! run: the temperature range, the cooling schedule, the iteration budget,
//! optional periodic reheating and the seed.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::annealing::{CoolingSchedule, SaConfig};
//!
//! // Create a new SaConfig instance with every parameter given
//! let config = SaConfig::new(100.0, 0.001, CoolingSchedule::Geometric, 0.999, 10_000, 42);
//! assert!(config.validate().is_ok());
//!
//! // Or use the builder, which fills the remaining fields with defaults
//! let config = SaConfig::builder()
//!     .initial_temp(10.0)
//!     .cooling(CoolingSchedule::LamDelosme)
//!     .reheat_interval(2_000)
//!     .seed(7)
//!     .build();
//! assert_eq!(config.get_reheat_interval(), 2_000);
//! ```
//!
//! ## Fields
//!
//! - `initial_temp`: Starting temperature, also the base for reheating.
//! - `final_temp`: The run stops once the temperature drops below this value.
//! - `cooling`: The `CoolingSchedule` applied after every iteration.
//! - `alpha`: Geometric cooling factor in (0, 1); also the base factor of the
//!   adaptive schedules.
//! - `max_iterations`: Hard iteration budget.
//! - `reheat_interval`: Reheat every this many iterations; 0 disables reheating.
//! - `reheat_temp_fraction`: Reheating resets the temperature to
//!   `initial_temp * reheat_temp_fraction`.
//! - `seed`: Seed of the run's `RandomNumberGenerator`.
//! - `huang_lambda`: The λ of Huang's schedule.

use super::cooling::CoolingSchedule;
use crate::error::{ensure_finite, Result, StochoptError};

const DEFAULT_INITIAL_TEMP: f64 = 100.0;
const DEFAULT_FINAL_TEMP: f64 = 1e-3;
const DEFAULT_ALPHA: f64 = 0.95;
const DEFAULT_MAX_ITERATIONS: usize = 10_000;
const DEFAULT_REHEAT_TEMP_FRACTION: f64 = 0.5;
const DEFAULT_HUANG_LAMBDA: f64 = 0.7;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SaConfig {
    initial_temp: f64,
    final_temp: f64,
    cooling: CoolingSchedule,
    alpha: f64,
    max_iterations: usize,
    reheat_interval: usize,
    reheat_temp_fraction: f64,
    seed: u64,
    huang_lambda: f64,
}

impl SaConfig {
    /// Creates a new `SaConfig` with reheating disabled and the default Huang λ.
    pub fn new(
        initial_temp: f64,
        final_temp: f64,
        cooling: CoolingSchedule,
        alpha: f64,
        max_iterations: usize,
        seed: u64,
    ) -> Self {
        Self {
            initial_temp,
            final_temp,
            cooling,
            alpha,
            max_iterations,
            reheat_interval: 0,
            reheat_temp_fraction: DEFAULT_REHEAT_TEMP_FRACTION,
            seed,
            huang_lambda: DEFAULT_HUANG_LAMBDA,
        }
    }

    pub fn get_initial_temp(&self) -> f64 {
        self.initial_temp
    }

    pub fn get_final_temp(&self) -> f64 {
        self.final_temp
    }

    pub fn get_cooling(&self) -> CoolingSchedule {
        self.cooling
    }

    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn get_max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn get_reheat_interval(&self) -> usize {
        self.reheat_interval
    }

    pub fn get_reheat_temp_fraction(&self) -> f64 {
        self.reheat_temp_fraction
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_huang_lambda(&self) -> f64 {
        self.huang_lambda
    }

    /// Sets the initial temperature.
    pub fn set_initial_temp(&mut self, value: f64) {
        self.initial_temp = value;
    }

    /// Sets the final temperature.
    pub fn set_final_temp(&mut self, value: f64) {
        self.final_temp = value;
    }

    /// Sets the cooling schedule.
    pub fn set_cooling(&mut self, value: CoolingSchedule) {
        self.cooling = value;
    }

    /// Sets the cooling factor.
    pub fn set_alpha(&mut self, value: f64) {
        self.alpha = value;
    }

    /// Sets the iteration budget.
    pub fn set_max_iterations(&mut self, value: usize) {
        self.max_iterations = value;
    }

    /// Sets the reheat interval. 0 disables reheating.
    pub fn set_reheat_interval(&mut self, value: usize) {
        self.reheat_interval = value;
    }

    /// Sets the fraction of the initial temperature used when reheating.
    pub fn set_reheat_temp_fraction(&mut self, value: f64) {
        self.reheat_temp_fraction = value;
    }

    /// Sets the seed.
    pub fn set_seed(&mut self, value: u64) {
        self.seed = value;
    }

    /// Sets Huang's λ.
    pub fn set_huang_lambda(&mut self, value: f64) {
        self.huang_lambda = value;
    }

    /// Checks the invariants `initial_temp > final_temp > 0`, `alpha ∈ (0, 1)`,
    /// `reheat_temp_fraction ∈ (0, 1]` and `huang_lambda > 0`.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("initial_temp", self.initial_temp)?;
        ensure_finite("final_temp", self.final_temp)?;
        ensure_finite("alpha", self.alpha)?;
        ensure_finite("reheat_temp_fraction", self.reheat_temp_fraction)?;
        ensure_finite("huang_lambda", self.huang_lambda)?;

        if self.final_temp <= 0.0 {
            return Err(StochoptError::Configuration(
                "Final temperature must be positive".to_string(),
            ));
        }
        if self.initial_temp <= self.final_temp {
            return Err(StochoptError::Configuration(format!(
                "Initial temperature ({}) must exceed final temperature ({})",
                self.initial_temp, self.final_temp
            )));
        }
        if self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(StochoptError::Configuration(format!(
                "Cooling factor alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.reheat_temp_fraction <= 0.0 || self.reheat_temp_fraction > 1.0 {
            return Err(StochoptError::Configuration(format!(
                "Reheat temperature fraction must be in (0, 1], got {}",
                self.reheat_temp_fraction
            )));
        }
        if self.huang_lambda <= 0.0 {
            return Err(StochoptError::Configuration(
                "Huang lambda must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a builder for creating an `SaConfig` instance.
    pub fn builder() -> SaConfigBuilder {
        SaConfigBuilder::default()
    }
}

impl Default for SaConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_INITIAL_TEMP,
            DEFAULT_FINAL_TEMP,
            CoolingSchedule::default(),
            DEFAULT_ALPHA,
            DEFAULT_MAX_ITERATIONS,
            0,
        )
    }
}

/// Builder for `SaConfig`.
///
/// Provides a fluent interface for constructing `SaConfig` instances.
#[derive(Debug, Clone, Default)]
pub struct SaConfigBuilder {
    initial_temp: Option<f64>,
    final_temp: Option<f64>,
    cooling: Option<CoolingSchedule>,
    alpha: Option<f64>,
    max_iterations: Option<usize>,
    reheat_interval: Option<usize>,
    reheat_temp_fraction: Option<f64>,
    seed: Option<u64>,
    huang_lambda: Option<f64>,
}

impl SaConfigBuilder {
    /// Sets the initial temperature.
    pub fn initial_temp(mut self, value: f64) -> Self {
        self.initial_temp = Some(value);
        self
    }

    /// Sets the final temperature.
    pub fn final_temp(mut self, value: f64) -> Self {
        self.final_temp = Some(value);
        self
    }

    /// Sets the cooling schedule.
    pub fn cooling(mut self, value: CoolingSchedule) -> Self {
        self.cooling = Some(value);
        self
    }

    /// Sets the cooling factor.
    pub fn alpha(mut self, value: f64) -> Self {
        self.alpha = Some(value);
        self
    }

    /// Sets the iteration budget.
    pub fn max_iterations(mut self, value: usize) -> Self {
        self.max_iterations = Some(value);
        self
    }

    /// Sets the reheat interval.
    pub fn reheat_interval(mut self, value: usize) -> Self {
        self.reheat_interval = Some(value);
        self
    }

    /// Sets the reheat temperature fraction.
    pub fn reheat_temp_fraction(mut self, value: f64) -> Self {
        self.reheat_temp_fraction = Some(value);
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Sets Huang's λ.
    pub fn huang_lambda(mut self, value: f64) -> Self {
        self.huang_lambda = Some(value);
        self
    }

    /// Builds the `SaConfig` instance. Validation happens when a run starts.
    pub fn build(self) -> SaConfig {
        SaConfig {
            initial_temp: self.initial_temp.unwrap_or(DEFAULT_INITIAL_TEMP),
            final_temp: self.final_temp.unwrap_or(DEFAULT_FINAL_TEMP),
            cooling: self.cooling.unwrap_or_default(),
            alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            reheat_interval: self.reheat_interval.unwrap_or(0),
            reheat_temp_fraction: self
                .reheat_temp_fraction
                .unwrap_or(DEFAULT_REHEAT_TEMP_FRACTION),
            seed: self.seed.unwrap_or(0),
            huang_lambda: self.huang_lambda.unwrap_or(DEFAULT_HUANG_LAMBDA),
        }
    }
}
