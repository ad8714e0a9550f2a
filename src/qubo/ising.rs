//! Ising models and the QUBO → Ising transform.
//!
//! Spins are carried as `f64` values `±1.0` so they can flow through the
//! engines as an ordinary [`State`].

use crate::energy::{EnergyFunction, NeighborFunction, State};
use crate::error::{ensure_len, Result};
use crate::rng::RandomNumberGenerator;

use super::matrix::QuboMatrix;

/// Spin model with energy `−Σ h_i s_i − Σ_{i<j} J_ij s_i s_j`.
///
/// Couplings are stored dense and symmetric with a zero diagonal.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IsingModel {
    n: usize,
    couplings: Vec<f64>,
    field: Vec<f64>,
}

impl IsingModel {
    /// Creates a model over `n` spins with no couplings and no field.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            couplings: vec![0.0; n * n],
            field: vec![0.0; n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.couplings[i * self.n + j]
    }

    /// Sets `J_ij` and `J_ji`. Diagonal writes are ignored.
    pub fn set_coupling(&mut self, i: usize, j: usize, value: f64) {
        if i == j {
            return;
        }
        self.couplings[i * self.n + j] = value;
        self.couplings[j * self.n + i] = value;
    }

    pub fn field(&self, i: usize) -> f64 {
        self.field[i]
    }

    pub fn set_field(&mut self, i: usize, value: f64) {
        self.field[i] = value;
    }

    /// Row-major `n × n` couplings.
    pub fn couplings(&self) -> &[f64] {
        &self.couplings
    }

    pub(crate) fn energy_unchecked(&self, spins: &[f64]) -> f64 {
        let len = self.n.min(spins.len());
        let mut energy = 0.0;
        for i in 0..len {
            let s_i = spins[i];
            energy -= self.field[i] * s_i;
            let row = &self.couplings[i * self.n..(i + 1) * self.n];
            for j in i + 1..len {
                energy -= row[j] * s_i * spins[j];
            }
        }
        energy
    }
}

/// Converts a QUBO matrix into an Ising model by substituting `x_i = (s_i + 1)/2`.
///
/// `J_ij = −Q_ij/4` and `h_i = −Q_ii/2 − Σ_{j≠i} Q_ij/4`. The constant term,
/// available as [`QuboMatrix::ising_offset`], is dropped: it does not move
/// the minimiser.
pub fn qubo_to_ising(q: &QuboMatrix) -> IsingModel {
    let n = q.size();
    let mut model = IsingModel::new(n);
    for i in 0..n {
        let mut h = -q.get(i, i) / 2.0;
        for j in 0..n {
            if j != i {
                h -= q.get(i, j) / 4.0;
            }
        }
        model.set_field(i, h);
        for j in i + 1..n {
            model.set_coupling(i, j, -q.get(i, j) / 4.0);
        }
    }
    model
}

/// Evaluates the Ising energy of `spins`.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `spins.len() != model.size()`.
pub fn evaluate_ising(model: &IsingModel, spins: &[f64]) -> Result<f64> {
    ensure_len(model.size(), spins.len())?;
    Ok(model.energy_unchecked(spins))
}

/// Maps spins to bits: `s ≥ 0 → 1`, otherwise `0`.
pub fn spins_to_binary(spins: &[f64]) -> Vec<u8> {
    spins.iter().map(|&s| u8::from(s >= 0.0)).collect()
}

/// Maps bits to spins: non-zero → `+1.0`, zero → `−1.0`.
pub fn binary_to_spins(x: &[u8]) -> Vec<f64> {
    x.iter().map(|&b| if b != 0 { 1.0 } else { -1.0 }).collect()
}

/// [`EnergyFunction`] view of an [`IsingModel`].
#[derive(Debug, Clone, Copy)]
pub struct IsingEnergy<'a> {
    model: &'a IsingModel,
}

impl<'a> IsingEnergy<'a> {
    pub fn new(model: &'a IsingModel) -> Self {
        Self { model }
    }
}

impl EnergyFunction for IsingEnergy<'_> {
    fn energy(&self, state: &[f64]) -> f64 {
        self.model.energy_unchecked(state)
    }
}

/// Flips one uniformly chosen spin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSpinFlip;

impl NeighborFunction for SingleSpinFlip {
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State {
        let mut next = state.to_vec();
        if !next.is_empty() {
            let i = rng.next_index(next.len());
            next[i] = -next[i];
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubo::matrix::evaluate_qubo;

    fn sample_qubo() -> QuboMatrix {
        let mut q = QuboMatrix::new(3);
        q.set(0, 0, -1.0);
        q.set(1, 1, 2.0);
        q.set(2, 2, -3.0);
        q.set(0, 1, 4.0);
        q.set(0, 2, -2.0);
        q.set(1, 2, 1.0);
        q
    }

    #[test]
    fn test_coefficients() {
        let model = qubo_to_ising(&sample_qubo());
        assert_eq!(model.coupling(0, 1), -1.0);
        assert_eq!(model.coupling(1, 0), -1.0);
        assert_eq!(model.coupling(0, 2), 0.5);
        assert_eq!(model.coupling(1, 1), 0.0);
        // h_0 = 1/2 - (4 - 2)/4
        assert_eq!(model.field(0), 0.0);
        // h_1 = -1 - (4 + 1)/4
        assert_eq!(model.field(1), -2.25);
    }

    #[test]
    fn test_energy_matches_qubo_up_to_offset_for_all_assignments() {
        let q = sample_qubo();
        let model = qubo_to_ising(&q);
        let offset = q.ising_offset();
        for bits in 0u8..8 {
            let x: Vec<u8> = (0..3).map(|i| (bits >> i) & 1).collect();
            let spins = binary_to_spins(&x);
            let e_q = evaluate_qubo(&q, &x).unwrap();
            let e_i = evaluate_ising(&model, &spins).unwrap();
            assert!((e_q - (e_i + offset)).abs() < 1e-12, "x = {:?}", x);
        }
    }

    #[test]
    fn test_spin_binary_conversion() {
        assert_eq!(spins_to_binary(&[-1.0, 1.0, 0.0, -0.3]), vec![0, 1, 1, 0]);
        assert_eq!(binary_to_spins(&[0, 1, 2]), vec![-1.0, 1.0, 1.0]);
        let x = vec![1, 0, 0, 1, 1];
        assert_eq!(spins_to_binary(&binary_to_spins(&x)), x);
    }

    #[test]
    fn test_evaluate_ising_dimension_mismatch() {
        let model = IsingModel::new(2);
        assert!(evaluate_ising(&model, &[1.0]).is_err());
    }

    #[test]
    fn test_hand_built_model() {
        let mut model = IsingModel::new(2);
        model.set_field(0, 1.0);
        model.set_coupling(0, 1, 2.0);
        model.set_coupling(1, 1, 9.0);
        assert_eq!(evaluate_ising(&model, &[1.0, 1.0]).unwrap(), -3.0);
        assert_eq!(evaluate_ising(&model, &[-1.0, 1.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_single_spin_flip_changes_exactly_one_spin() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let spins = vec![1.0, -1.0, 1.0, 1.0];
        for _ in 0..50 {
            let next = SingleSpinFlip.neighbor(&spins, &mut rng);
            let diffs = spins.iter().zip(&next).filter(|(a, b)| a != b).count();
            assert_eq!(diffs, 1);
        }
    }
}
