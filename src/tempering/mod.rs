//! # Parallel Tempering
//!
//! Replica-exchange Monte Carlo. `n` Metropolis chains run at fixed
//! temperatures on an ascending ladder (slot 0 is the coldest). Every round
//! each chain performs `sweeps_per_swap` local moves, then adjacent slots try
//! to exchange their states using the detailed-balance rule
//! `accept if Δ > 0, else with probability exp(Δ)`, with
//! `Δ = (1/T_i − 1/T_{i+1})·(E_i − E_{i+1})`. Even rounds try the pairs
//! `(0,1), (2,3), …`, odd rounds `(1,2), (3,4), …`.
//!
//! Every slot owns a random stream derived from the seed in slot order, and the
//! exchange phase draws from a separate master stream. Running the local phase
//! on the rayon pool (`PtConfig::parallel`) therefore produces exactly the same
//! result as running it sequentially.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::energy::UniformPerturbation;
//! use stochopt::tempering::{parallel_tempering, PtConfig, Spacing};
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! let config = PtConfig::new(6, 0.1, 100.0, Spacing::Geometric, 50, 200, 42);
//!
//! let result = parallel_tempering(
//!     &[5.0, 5.0, 5.0, 5.0],
//!     sphere,
//!     UniformPerturbation::new(0.5)?,
//!     &config,
//! )?;
//!
//! assert!(result.best_energy < 10.0);
//! assert_eq!(result.swap_acceptance_rates.len(), 5);
//! # Ok::<(), stochopt::error::StochoptError>(())
//! ```

pub mod ladder;
pub mod options;

pub use ladder::{
    adapt_ladder, geometric_ladder, is_strictly_increasing, ADAPT_INTERVAL, ADAPT_STEP,
    ADAPT_TOLERANCE, TARGET_SWAP_RATE,
};
pub use options::{PtConfig, PtConfigBuilder, Spacing, MIN_REPLICAS};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::cancel::{self, CancellationToken};
use crate::energy::{EnergyFunction, NeighborFunction, State};
use crate::error::{Result, StochoptError};
use crate::metropolis::{exchange_accept, improves_on, metropolis_accept};
use crate::rng::RandomNumberGenerator;

/// Outcome of a parallel tempering run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PtResult {
    /// The lowest-energy state seen by any replica.
    pub best_state: State,
    pub best_energy: f64,
    /// Energy held by each ladder slot at the end of the run, coldest first.
    pub replica_energies: Vec<f64>,
    /// Accepted / attempted exchanges for each adjacent pair `(i, i + 1)`.
    pub swap_acceptance_rates: Vec<f64>,
    /// Energy of each slot after every exchange round.
    pub energy_traces: Vec<Vec<f64>>,
    /// The ladder at the end of the run. Differs from the initial geometric
    /// ladder only under `Spacing::Adaptive`.
    pub temperatures: Vec<f64>,
    /// Local Metropolis acceptance rate of each slot.
    pub move_acceptance_rates: Vec<f64>,
    /// Number of exchange rounds completed.
    pub rounds: usize,
    pub cancelled: bool,
}

/// One Metropolis chain bound to a ladder slot.
#[derive(Debug, Clone)]
struct Replica {
    state: State,
    energy: f64,
    rng: RandomNumberGenerator,
    best_state: State,
    best_energy: f64,
    moves: usize,
    accepts: usize,
}

impl Replica {
    fn new(state: State, energy: f64, rng: RandomNumberGenerator) -> Self {
        Self {
            best_state: state.clone(),
            best_energy: energy,
            state,
            energy,
            rng,
            moves: 0,
            accepts: 0,
        }
    }

    fn sweep<E, N>(&mut self, temperature: f64, sweeps: usize, energy: &E, neighbor: &N)
    where
        E: EnergyFunction,
        N: NeighborFunction,
    {
        for _ in 0..sweeps {
            let candidate = neighbor.neighbor(&self.state, &mut self.rng);
            let candidate_energy = energy.energy(&candidate);
            self.moves += 1;
            if metropolis_accept(self.energy, candidate_energy, temperature, &mut self.rng) {
                self.state = candidate;
                self.energy = candidate_energy;
                self.accepts += 1;
                if improves_on(self.energy, self.best_energy) {
                    self.best_state.clone_from(&self.state);
                    self.best_energy = self.energy;
                }
            }
        }
    }

    fn move_acceptance_rate(&self) -> f64 {
        ratio(self.accepts, self.moves)
    }
}

/// Swap bookkeeping for one adjacent pair.
#[derive(Debug, Clone, Copy, Default)]
struct PairStats {
    attempts: usize,
    accepts: usize,
    window_attempts: usize,
    window_accepts: usize,
}

impl PairStats {
    fn record(&mut self, accepted: bool) {
        self.attempts += 1;
        self.window_attempts += 1;
        if accepted {
            self.accepts += 1;
            self.window_accepts += 1;
        }
    }

    fn take_window_rate(&mut self) -> f64 {
        let rate = ratio(self.window_accepts, self.window_attempts);
        self.window_attempts = 0;
        self.window_accepts = 0;
        rate
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Runs parallel tempering over a fixed energy and neighbor function.
#[derive(Debug, Clone)]
pub struct Tempering<E, N>
where
    E: EnergyFunction + Sync,
    N: NeighborFunction + Sync,
{
    energy: E,
    neighbor: N,
}

impl<E, N> Tempering<E, N>
where
    E: EnergyFunction + Sync,
    N: NeighborFunction + Sync,
{
    /// Creates a new `Tempering` engine for the given energy and neighbor functions.
    pub fn new(energy: E, neighbor: N) -> Self {
        Self { energy, neighbor }
    }

    /// Runs `total_swaps` exchange rounds starting every replica from `initial`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `initial` is empty.
    pub fn run(&self, initial: &[f64], config: &PtConfig) -> Result<PtResult> {
        self.run_with_cancel(initial, config, None)
    }

    /// Like [`Tempering::run`], polling `cancel` once per exchange round.
    pub fn run_with_cancel(
        &self,
        initial: &[f64],
        config: &PtConfig,
        cancel: Option<&CancellationToken>,
    ) -> Result<PtResult> {
        config.validate()?;
        if initial.is_empty() {
            return Err(StochoptError::EmptyState);
        }

        let n = config.effective_replicas();
        if n != config.get_n_replicas() {
            warn!(
                requested = config.get_n_replicas(),
                used = n,
                "too few replicas requested, clamping"
            );
        }

        let mut temps = geometric_ladder(config.get_t_min(), config.get_t_max(), n);
        let mut master = RandomNumberGenerator::from_seed(config.get_seed());
        let initial_energy = self.energy.energy(initial);
        let mut replicas: Vec<Replica> = (0..n)
            .map(|_| Replica::new(initial.to_vec(), initial_energy, master.derive_stream()))
            .collect();

        let mut best_state = initial.to_vec();
        let mut best_energy = initial_energy;
        let mut pairs = vec![PairStats::default(); n - 1];
        let total_swaps = config.get_total_swaps();
        let mut energy_traces: Vec<Vec<f64>> = (0..n).map(|_| Vec::with_capacity(total_swaps)).collect();
        let adaptive = config.get_spacing() == Spacing::Adaptive;
        let sweeps = config.get_sweeps_per_swap();

        debug!(
            replicas = n,
            ladder = ?temps,
            sweeps_per_swap = sweeps,
            total_swaps,
            parallel = config.is_parallel(),
            "starting parallel tempering"
        );

        let mut rounds = 0usize;
        let mut cancelled = false;
        while rounds < total_swaps {
            if cancel::is_cancelled(cancel) {
                cancelled = true;
                break;
            }

            self.local_phase(&mut replicas, &temps, sweeps, config.is_parallel());

            for replica in &replicas {
                if improves_on(replica.best_energy, best_energy) {
                    best_state.clone_from(&replica.best_state);
                    best_energy = replica.best_energy;
                }
            }

            exchange_phase(&mut replicas, &temps, &mut pairs, rounds % 2, &mut master);

            for (trace, replica) in energy_traces.iter_mut().zip(&replicas) {
                trace.push(replica.energy);
            }

            rounds += 1;

            if adaptive && n > 2 && rounds % ADAPT_INTERVAL == 0 {
                let rates: Vec<f64> = pairs.iter_mut().map(PairStats::take_window_rate).collect();
                let moved = adapt_ladder(&mut temps, &rates);
                trace!(rounds, moved, ladder = ?temps, "adapted temperature ladder");
            }
        }

        let swap_acceptance_rates: Vec<f64> = pairs
            .iter()
            .map(|p| ratio(p.accepts, p.attempts))
            .collect();

        debug!(
            rounds,
            best_energy,
            swap_rates = ?swap_acceptance_rates,
            cancelled,
            "parallel tempering finished"
        );

        Ok(PtResult {
            best_state,
            best_energy,
            replica_energies: replicas.iter().map(|r| r.energy).collect(),
            swap_acceptance_rates,
            energy_traces,
            temperatures: temps,
            move_acceptance_rates: replicas.iter().map(Replica::move_acceptance_rate).collect(),
            rounds,
            cancelled,
        })
    }

    fn local_phase(&self, replicas: &mut [Replica], temps: &[f64], sweeps: usize, parallel: bool) {
        if parallel {
            replicas
                .par_iter_mut()
                .zip(temps.par_iter())
                .for_each(|(replica, &t)| replica.sweep(t, sweeps, &self.energy, &self.neighbor));
        } else {
            for (replica, &t) in replicas.iter_mut().zip(temps) {
                replica.sweep(t, sweeps, &self.energy, &self.neighbor);
            }
        }
    }
}

/// Attempts exchanges between the adjacent pairs selected by `parity`.
fn exchange_phase(
    replicas: &mut [Replica],
    temps: &[f64],
    pairs: &mut [PairStats],
    parity: usize,
    rng: &mut RandomNumberGenerator,
) {
    let mut i = parity;
    while i + 1 < replicas.len() {
        let accepted = exchange_accept(
            temps[i],
            temps[i + 1],
            replicas[i].energy,
            replicas[i + 1].energy,
            rng,
        );
        pairs[i].record(accepted);
        if accepted {
            let (cold, hot) = replicas.split_at_mut(i + 1);
            std::mem::swap(&mut cold[i].state, &mut hot[0].state);
            std::mem::swap(&mut cold[i].energy, &mut hot[0].energy);
        }
        i += 2;
    }
}

/// Runs parallel tempering from `initial`.
///
/// Convenience wrapper around [`Tempering::run`].
pub fn parallel_tempering<E, N>(
    initial: &[f64],
    energy: E,
    neighbor: N,
    config: &PtConfig,
) -> Result<PtResult>
where
    E: EnergyFunction + Sync,
    N: NeighborFunction + Sync,
{
    Tempering::new(energy, neighbor).run(initial, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::UniformPerturbation;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn small_config() -> PtConfig {
        PtConfig::new(4, 0.1, 10.0, Spacing::Geometric, 10, 40, 3)
    }

    #[test]
    fn test_shapes() {
        let perturb = UniformPerturbation::new(0.5).unwrap();
        let result = parallel_tempering(&[1.0, 2.0], sphere, perturb, &small_config()).unwrap();

        assert_eq!(result.replica_energies.len(), 4);
        assert_eq!(result.swap_acceptance_rates.len(), 3);
        assert_eq!(result.energy_traces.len(), 4);
        assert!(result.energy_traces.iter().all(|t| t.len() == 40));
        assert_eq!(result.rounds, 40);
        assert_eq!(result.temperatures, geometric_ladder(0.1, 10.0, 4));
    }

    #[test]
    fn test_best_is_at_most_final_replica_energies() {
        let perturb = UniformPerturbation::new(0.5).unwrap();
        let result = parallel_tempering(&[3.0, 3.0], sphere, perturb, &small_config()).unwrap();
        let min_final = result
            .replica_energies
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert!(result.best_energy <= min_final);
        assert!(result.best_energy <= 18.0);
    }

    #[test]
    fn test_single_replica_is_clamped_to_two() {
        let perturb = UniformPerturbation::new(0.5).unwrap();
        let config = PtConfig::builder().n_replicas(1).total_swaps(10).build();
        let result = parallel_tempering(&[1.0], sphere, perturb, &config).unwrap();
        assert_eq!(result.replica_energies.len(), 2);
        assert_eq!(result.swap_acceptance_rates.len(), 1);
    }

    #[test]
    fn test_exchange_parity() {
        let mut master = RandomNumberGenerator::from_seed(0);
        let mut replicas: Vec<Replica> = (0..4)
            .map(|i| Replica::new(vec![i as f64], 100.0 - i as f64, master.derive_stream()))
            .collect();
        let temps = geometric_ladder(1.0, 8.0, 4);
        let mut pairs = vec![PairStats::default(); 3];

        exchange_phase(&mut replicas, &temps, &mut pairs, 0, &mut master);
        assert_eq!(pairs[0].attempts, 1);
        assert_eq!(pairs[1].attempts, 0);
        assert_eq!(pairs[2].attempts, 1);

        exchange_phase(&mut replicas, &temps, &mut pairs, 1, &mut master);
        assert_eq!(pairs[1].attempts, 1);
    }

    #[test]
    fn test_exchange_moves_low_energy_to_cold_slot() {
        let mut master = RandomNumberGenerator::from_seed(0);
        let mut replicas = vec![
            Replica::new(vec![9.0], 81.0, master.derive_stream()),
            Replica::new(vec![0.0], 0.0, master.derive_stream()),
        ];
        let mut pairs = vec![PairStats::default(); 1];
        exchange_phase(&mut replicas, &[1.0, 2.0], &mut pairs, 0, &mut master);
        assert_eq!(replicas[0].state, vec![0.0]);
        assert_eq!(replicas[0].energy, 0.0);
        assert_eq!(replicas[1].energy, 81.0);
        assert_eq!(pairs[0].accepts, 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let perturb = UniformPerturbation::new(0.5).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = Tempering::new(sphere, perturb)
            .run_with_cancel(&[1.0], &small_config(), Some(&token))
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.rounds, 0);
        assert_eq!(result.best_energy, 1.0);
        assert!(result.energy_traces.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_empty_state_rejected() {
        let perturb = UniformPerturbation::new(0.5).unwrap();
        let result = parallel_tempering(&[], sphere, perturb, &small_config());
        assert_eq!(result, Err(StochoptError::EmptyState));
    }
}
