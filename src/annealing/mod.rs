//! # Simulated Annealing
//!
//! A single Metropolis chain whose temperature follows a [`CoolingSchedule`],
//! optionally reheated at a fixed interval. The run stops when the temperature
//! falls below `final_temp` or the iteration budget is spent, whichever comes
//! first. Reheating never discards the best state found so far.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::annealing::{simulated_annealing, CoolingSchedule, SaConfig};
//! use stochopt::energy::UniformPerturbation;
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! let config = SaConfig::new(100.0, 0.001, CoolingSchedule::Geometric, 0.999, 10_000, 42);
//!
//! let result = simulated_annealing(
//!     &[5.0, 5.0, 5.0, 5.0],
//!     &config,
//!     sphere,
//!     UniformPerturbation::new(0.5)?,
//! )?;
//!
//! assert!(result.best_energy < 10.0);
//! assert_eq!(result.accepts + result.rejects, result.iterations);
//! # Ok::<(), stochopt::error::StochoptError>(())
//! ```

pub mod cooling;
pub mod options;

pub use cooling::{Cooler, CoolingSchedule, COOLING_WINDOW, LAM_TARGET_ACCEPTANCE};
pub use options::{SaConfig, SaConfigBuilder};

use tracing::{debug, trace};

use crate::cancel::{self, CancellationToken};
use crate::energy::{EnergyFunction, NeighborFunction, State};
use crate::error::{Result, StochoptError};
use crate::metropolis::{improves_on, metropolis_accept};
use crate::rng::RandomNumberGenerator;

/// Upper bound on the history capacity reserved up front.
const MAX_PREALLOCATED_HISTORY: usize = 1 << 20;

/// Outcome of a simulated annealing run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SaResult {
    /// The lowest-energy state visited by the chain.
    pub best_state: State,
    /// Energy of `best_state`.
    pub best_energy: f64,
    /// Number of iterations performed. Always `accepts + rejects`.
    pub iterations: usize,
    pub accepts: usize,
    pub rejects: usize,
    pub reheats: usize,
    /// Energy of the current state after each iteration.
    pub energy_history: Vec<f64>,
    /// Temperature at which each iteration was evaluated.
    pub temp_history: Vec<f64>,
    /// Temperature after the last cooling step.
    pub final_temperature: f64,
    /// Acceptance ratio over the last `COOLING_WINDOW` iterations.
    pub acceptance_ratio: f64,
    /// Whether the run was stopped through a `CancellationToken`.
    pub cancelled: bool,
}

/// Runs simulated annealing over a fixed energy and neighbor function.
#[derive(Debug, Clone)]
pub struct Annealer<E, N>
where
    E: EnergyFunction,
    N: NeighborFunction,
{
    energy: E,
    neighbor: N,
}

impl<E, N> Annealer<E, N>
where
    E: EnergyFunction,
    N: NeighborFunction,
{
    /// Creates a new `Annealer` for the given energy and neighbor functions.
    pub fn new(energy: E, neighbor: N) -> Self {
        Self { energy, neighbor }
    }

    pub fn energy_function(&self) -> &E {
        &self.energy
    }

    /// Anneals from `initial` until the temperature or iteration budget runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `initial` is empty.
    pub fn anneal(&self, initial: &[f64], config: &SaConfig) -> Result<SaResult> {
        self.anneal_with_cancel(initial, config, None)
    }

    /// Like [`Annealer::anneal`], polling `cancel` once per iteration.
    pub fn anneal_with_cancel(
        &self,
        initial: &[f64],
        config: &SaConfig,
        cancel: Option<&CancellationToken>,
    ) -> Result<SaResult> {
        config.validate()?;
        if initial.is_empty() {
            return Err(StochoptError::EmptyState);
        }

        let mut rng = RandomNumberGenerator::from_seed(config.get_seed());
        let mut cooler = Cooler::new(
            config.get_cooling(),
            config.get_alpha(),
            config.get_huang_lambda(),
        );

        let mut current: State = initial.to_vec();
        let mut current_energy = self.energy.energy(&current);
        let mut best_state = current.clone();
        let mut best_energy = current_energy;

        let max_iterations = config.get_max_iterations();
        let reheat_interval = config.get_reheat_interval();
        let reheat_temp = config.get_initial_temp() * config.get_reheat_temp_fraction();
        let mut temperature = config.get_initial_temp();

        let capacity = max_iterations.min(MAX_PREALLOCATED_HISTORY);
        let mut energy_history = Vec::with_capacity(capacity);
        let mut temp_history = Vec::with_capacity(capacity);

        let mut iterations = 0usize;
        let mut accepts = 0usize;
        let mut rejects = 0usize;
        let mut reheats = 0usize;
        let mut cancelled = false;

        debug!(
            schedule = ?config.get_cooling(),
            initial_temp = config.get_initial_temp(),
            final_temp = config.get_final_temp(),
            max_iterations,
            initial_energy = current_energy,
            "starting simulated annealing"
        );

        let stop_reason = loop {
            if iterations >= max_iterations {
                break "iteration budget spent";
            }
            if temperature < config.get_final_temp() {
                break "final temperature reached";
            }
            if cancel::is_cancelled(cancel) {
                cancelled = true;
                break "cancelled";
            }

            let candidate = self.neighbor.neighbor(&current, &mut rng);
            let candidate_energy = self.energy.energy(&candidate);
            let accepted = metropolis_accept(current_energy, candidate_energy, temperature, &mut rng);

            if accepted {
                current = candidate;
                current_energy = candidate_energy;
                accepts += 1;
            } else {
                rejects += 1;
            }
            iterations += 1;

            if improves_on(current_energy, best_energy) {
                best_state.clone_from(&current);
                best_energy = current_energy;
            }

            energy_history.push(current_energy);
            temp_history.push(temperature);

            cooler.observe(accepted, current_energy);
            temperature = cooler.next_temperature(temperature);

            if reheat_interval > 0 && iterations % reheat_interval == 0 {
                temperature = reheat_temp;
                reheats += 1;
                trace!(iterations, temperature, best_energy, "reheating");
            }
        };

        debug!(
            reason = stop_reason,
            iterations,
            accepts,
            reheats,
            best_energy,
            final_temperature = temperature,
            "simulated annealing finished"
        );

        Ok(SaResult {
            best_state,
            best_energy,
            iterations,
            accepts,
            rejects,
            reheats,
            energy_history,
            temp_history,
            final_temperature: temperature,
            acceptance_ratio: cooler.acceptance_ratio(),
            cancelled,
        })
    }
}

/// Runs simulated annealing from `initial`.
///
/// Convenience wrapper around [`Annealer::anneal`].
pub fn simulated_annealing<E, N>(
    initial: &[f64],
    config: &SaConfig,
    energy: E,
    neighbor: N,
) -> Result<SaResult>
where
    E: EnergyFunction,
    N: NeighborFunction,
{
    Annealer::new(energy, neighbor).anneal(initial, config)
}
