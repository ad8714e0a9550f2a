//! # PtConfig
//!
//! The `PtConfig` struct configures a parallel tempering run: the size and
//! span of the temperature ladder, how the ladder is spaced, how many local
//! Metropolis sweeps separate two exchange rounds, how many rounds to run, the
//! seed, and whether the local phase runs on the rayon thread pool.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::tempering::{PtConfig, Spacing};
//!
//! let config = PtConfig::new(6, 0.1, 100.0, Spacing::Geometric, 50, 200, 42);
//! assert!(config.validate().is_ok());
//!
//! let config = PtConfig::builder()
//!     .n_replicas(1)
//!     .spacing(Spacing::Adaptive)
//!     .parallel(true)
//!     .build();
//! // Fewer than two replicas is clamped, not rejected.
//! assert_eq!(config.effective_replicas(), 2);
//! ```

use crate::error::{ensure_finite, Result, StochoptError};

/// Smallest ladder the engine will run.
pub const MIN_REPLICAS: usize = 2;

const DEFAULT_N_REPLICAS: usize = 8;
const DEFAULT_T_MIN: f64 = 0.1;
const DEFAULT_T_MAX: f64 = 100.0;
const DEFAULT_SWEEPS_PER_SWAP: usize = 50;
const DEFAULT_TOTAL_SWAPS: usize = 200;

/// How the temperature ladder is laid out between `t_min` and `t_max`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    /// Fixed geometric ladder.
    #[default]
    Geometric,
    /// Geometric start, interior temperatures tuned towards a 0.234 swap rate.
    Adaptive,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PtConfig {
    n_replicas: usize,
    t_min: f64,
    t_max: f64,
    spacing: Spacing,
    sweeps_per_swap: usize,
    total_swaps: usize,
    seed: u64,
    /// Run the local phase on the rayon thread pool.
    parallel: bool,
}

impl PtConfig {
    pub fn new(
        n_replicas: usize,
        t_min: f64,
        t_max: f64,
        spacing: Spacing,
        sweeps_per_swap: usize,
        total_swaps: usize,
        seed: u64,
    ) -> Self {
        Self {
            n_replicas,
            t_min,
            t_max,
            spacing,
            sweeps_per_swap,
            total_swaps,
            seed,
            parallel: false,
        }
    }

    /// Returns the replica count as configured, before clamping.
    pub fn get_n_replicas(&self) -> usize {
        self.n_replicas
    }

    /// Returns the replica count the engine actually runs.
    pub fn effective_replicas(&self) -> usize {
        self.n_replicas.max(MIN_REPLICAS)
    }

    pub fn get_t_min(&self) -> f64 {
        self.t_min
    }

    pub fn get_t_max(&self) -> f64 {
        self.t_max
    }

    pub fn get_spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn get_sweeps_per_swap(&self) -> usize {
        self.sweeps_per_swap
    }

    pub fn get_total_swaps(&self) -> usize {
        self.total_swaps
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Sets the number of replicas.
    pub fn set_n_replicas(&mut self, value: usize) {
        self.n_replicas = value;
    }

    /// Sets the coldest temperature.
    pub fn set_t_min(&mut self, value: f64) {
        self.t_min = value;
    }

    /// Sets the hottest temperature.
    pub fn set_t_max(&mut self, value: f64) {
        self.t_max = value;
    }

    /// Sets the ladder spacing.
    pub fn set_spacing(&mut self, value: Spacing) {
        self.spacing = value;
    }

    /// Sets the number of Metropolis sweeps between exchange rounds.
    pub fn set_sweeps_per_swap(&mut self, value: usize) {
        self.sweeps_per_swap = value;
    }

    /// Sets the number of exchange rounds.
    pub fn set_total_swaps(&mut self, value: usize) {
        self.total_swaps = value;
    }

    /// Sets the seed.
    pub fn set_seed(&mut self, value: u64) {
        self.seed = value;
    }

    /// Enables or disables the parallel local phase.
    pub fn set_parallel(&mut self, value: bool) {
        self.parallel = value;
    }

    /// Checks `0 < t_min < t_max` with both temperatures finite.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("t_min", self.t_min)?;
        ensure_finite("t_max", self.t_max)?;
        if self.t_min <= 0.0 {
            return Err(StochoptError::Configuration(
                "Minimum temperature must be positive".to_string(),
            ));
        }
        if self.t_min >= self.t_max {
            return Err(StochoptError::Configuration(format!(
                "Minimum temperature ({}) must be below maximum temperature ({})",
                self.t_min, self.t_max
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating a `PtConfig` instance.
    pub fn builder() -> PtConfigBuilder {
        PtConfigBuilder::default()
    }
}

impl Default for PtConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_N_REPLICAS,
            DEFAULT_T_MIN,
            DEFAULT_T_MAX,
            Spacing::default(),
            DEFAULT_SWEEPS_PER_SWAP,
            DEFAULT_TOTAL_SWAPS,
            0,
        )
    }
}

/// Builder for `PtConfig`.
#[derive(Debug, Clone, Default)]
pub struct PtConfigBuilder {
    n_replicas: Option<usize>,
    t_min: Option<f64>,
    t_max: Option<f64>,
    spacing: Option<Spacing>,
    sweeps_per_swap: Option<usize>,
    total_swaps: Option<usize>,
    seed: Option<u64>,
    parallel: Option<bool>,
}

impl PtConfigBuilder {
    pub fn n_replicas(mut self, value: usize) -> Self {
        self.n_replicas = Some(value);
        self
    }

    pub fn t_min(mut self, value: f64) -> Self {
        self.t_min = Some(value);
        self
    }

    pub fn t_max(mut self, value: f64) -> Self {
        self.t_max = Some(value);
        self
    }

    pub fn spacing(mut self, value: Spacing) -> Self {
        self.spacing = Some(value);
        self
    }

    pub fn sweeps_per_swap(mut self, value: usize) -> Self {
        self.sweeps_per_swap = Some(value);
        self
    }

    pub fn total_swaps(mut self, value: usize) -> Self {
        self.total_swaps = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn parallel(mut self, value: bool) -> Self {
        self.parallel = Some(value);
        self
    }

    /// Builds the `PtConfig` instance. Validation happens when a run starts.
    pub fn build(self) -> PtConfig {
        PtConfig {
            n_replicas: self.n_replicas.unwrap_or(DEFAULT_N_REPLICAS),
            t_min: self.t_min.unwrap_or(DEFAULT_T_MIN),
            t_max: self.t_max.unwrap_or(DEFAULT_T_MAX),
            spacing: self.spacing.unwrap_or_default(),
            sweeps_per_swap: self.sweeps_per_swap.unwrap_or(DEFAULT_SWEEPS_PER_SWAP),
            total_swaps: self.total_swaps.unwrap_or(DEFAULT_TOTAL_SWAPS),
            seed: self.seed.unwrap_or(0),
            parallel: self.parallel.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PtConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_replicas(), 8);
        assert!(!config.is_parallel());
    }

    #[test]
    fn test_builder_matches_default() {
        assert_eq!(PtConfig::builder().build(), PtConfig::default());
    }

    #[test]
    fn test_replicas_are_clamped() {
        for n in [0, 1, 2] {
            let config = PtConfig::builder().n_replicas(n).build();
            assert_eq!(config.get_n_replicas(), n);
            assert_eq!(config.effective_replicas(), 2);
        }
    }

    #[test]
    fn test_validate_temperatures() {
        assert!(PtConfig::builder().t_min(0.0).build().validate().is_err());
        assert!(PtConfig::builder()
            .t_min(5.0)
            .t_max(5.0)
            .build()
            .validate()
            .is_err());
        assert!(PtConfig::builder()
            .t_max(f64::INFINITY)
            .build()
            .validate()
            .is_err());
    }

    #[test]
    fn test_setters() {
        let mut config = PtConfig::default();
        config.set_parallel(true);
        config.set_spacing(Spacing::Adaptive);
        config.set_total_swaps(3);
        assert!(config.is_parallel());
        assert_eq!(config.get_spacing(), Spacing::Adaptive);
        assert_eq!(config.get_total_swaps(), 3);
    }
}
