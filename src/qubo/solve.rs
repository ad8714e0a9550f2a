//! Solver wrappers running the engines on encoded models.
//!
//! Every wrapper starts from the all-zero assignment (all spins −1, every
//! Potts spin in state 0), so the answer is never worse than that starting
//! point.

use tracing::debug;

use crate::annealing::{Annealer, SaConfig};
use crate::error::{Result, StochoptError};
use crate::tempering::{PtConfig, Tempering};

use super::ising::{qubo_to_ising, spins_to_binary, IsingEnergy, SingleSpinFlip};
use super::matrix::QuboMatrix;
use super::potts::{PottsEnergy, PottsModel, PottsReassign};

fn ensure_finite_qubo(q: &QuboMatrix) -> Result<()> {
    if q.is_finite() {
        Ok(())
    } else {
        Err(StochoptError::InvalidNumericValue(
            "QUBO matrix contains a non-finite coefficient".to_string(),
        ))
    }
}

/// Minimises `q` with simulated annealing over single spin flips.
///
/// # Errors
///
/// Returns an error if `config` is invalid or `q` has a non-finite entry.
///
/// ```rust
/// use stochopt::annealing::SaConfig;
/// use stochopt::qubo::{solve_qubo_sa, QuboMatrix};
///
/// let mut q = QuboMatrix::new(2);
/// q.set(0, 0, -1.0);
/// q.set(1, 1, -1.0);
/// q.set(0, 1, 3.0);
///
/// let x = solve_qubo_sa(&q, &SaConfig::builder().seed(1).build())?;
/// assert_eq!(x.iter().map(|&b| b as usize).sum::<usize>(), 1);
/// # Ok::<(), stochopt::error::StochoptError>(())
/// ```
pub fn solve_qubo_sa(q: &QuboMatrix, config: &SaConfig) -> Result<Vec<u8>> {
    config.validate()?;
    ensure_finite_qubo(q)?;
    if q.size() == 0 {
        return Ok(Vec::new());
    }

    let model = qubo_to_ising(q);
    let initial = vec![-1.0; q.size()];
    let result = Annealer::new(IsingEnergy::new(&model), SingleSpinFlip).anneal(&initial, config)?;
    debug!(
        variables = q.size(),
        ising_energy = result.best_energy,
        "QUBO annealing finished"
    );
    Ok(spins_to_binary(&result.best_state))
}

/// Minimises `q` with parallel tempering over single spin flips.
///
/// # Errors
///
/// Returns an error if `config` is invalid or `q` has a non-finite entry.
pub fn solve_qubo_pt(q: &QuboMatrix, config: &PtConfig) -> Result<Vec<u8>> {
    config.validate()?;
    ensure_finite_qubo(q)?;
    if q.size() == 0 {
        return Ok(Vec::new());
    }

    let model = qubo_to_ising(q);
    let initial = vec![-1.0; q.size()];
    let result = Tempering::new(IsingEnergy::new(&model), SingleSpinFlip).run(&initial, config)?;
    debug!(
        variables = q.size(),
        ising_energy = result.best_energy,
        "QUBO tempering finished"
    );
    Ok(spins_to_binary(&result.best_state))
}

/// Minimises a Potts model with simulated annealing, moving one spin to a
/// different state per step. Returns one state index per spin.
///
/// # Errors
///
/// Returns an error if `config` is invalid.
pub fn solve_potts_sa(model: &PottsModel, config: &SaConfig) -> Result<Vec<usize>> {
    config.validate()?;
    if model.size() == 0 {
        return Ok(Vec::new());
    }

    let energy = PottsEnergy::new(model);
    let initial = vec![0.0; model.size()];
    let result = Annealer::new(energy, PottsReassign::new(model.states())).anneal(&initial, config)?;
    debug!(
        spins = model.size(),
        states = model.states(),
        best_energy = result.best_energy,
        "Potts annealing finished"
    );
    Ok(energy.decode(&result.best_state))
}
