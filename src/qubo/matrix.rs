//! Upper-triangular QUBO coefficient storage.

use crate::error::{ensure_len, Result};

/// A symmetric `n × n` QUBO matrix stored as a flat upper triangle.
///
/// Entry `(i, j)` lives at `min·(2n − min − 1)/2 + max` where `min` and `max`
/// are the smaller and larger of `i` and `j`. Every read and write goes
/// through [`QuboMatrix::index`], so `(i, j)` and `(j, i)` are the same cell.
///
/// ```rust
/// use stochopt::qubo::QuboMatrix;
///
/// let mut q = QuboMatrix::new(3);
/// q.add(2, 0, 1.5);
/// q.add(0, 2, 0.5);
/// assert_eq!(q.get(0, 2), 2.0);
/// assert_eq!(q.get(2, 0), 2.0);
/// assert_eq!(q.as_slice().len(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct QuboMatrix {
    n: usize,
    data: Vec<f64>,
}

impl QuboMatrix {
    /// Creates an all-zero matrix over `n` binary variables.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * (n + 1) / 2],
        }
    }

    /// Number of binary variables.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Flat storage offset of entry `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `size()`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.n && j < self.n,
            "QUBO index ({}, {}) out of range for size {}",
            i,
            j,
            self.n
        );
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        lo * (2 * self.n - lo - 1) / 2 + hi
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Adds `value` to entry `(i, j)`.
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.data[idx] += value;
    }

    /// The flat upper triangle, row by row.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns true if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Constant `C` with `evaluate_qubo(x) == evaluate_ising(s) + C` after
    /// [`qubo_to_ising`](super::ising::qubo_to_ising), i.e.
    /// `Σ Q_ii/2 + Σ_{i<j} Q_ij/4`.
    pub fn ising_offset(&self) -> f64 {
        let mut offset = 0.0;
        for i in 0..self.n {
            let row = self.index(i, i);
            offset += self.data[row] / 2.0;
            offset += self.data[row + 1..row + self.n - i].iter().sum::<f64>() / 4.0;
        }
        offset
    }

    /// `Σ Q_ii x_i + Σ_{i<j} Q_ij x_i x_j`; any non-zero `x_i` counts as 1.
    ///
    /// Walks each row of the triangle once; rows whose variable is 0 are skipped.
    pub(crate) fn energy_unchecked(&self, x: &[u8]) -> f64 {
        let len = self.n.min(x.len());
        let mut energy = 0.0;
        for i in 0..len {
            if x[i] == 0 {
                continue;
            }
            let row = self.index(i, i);
            energy += self.data[row];
            for j in i + 1..len {
                if x[j] != 0 {
                    energy += self.data[row + (j - i)];
                }
            }
        }
        energy
    }
}

/// Evaluates the QUBO energy of the binary assignment `x`.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `x.len() != q.size()`.
pub fn evaluate_qubo(q: &QuboMatrix, x: &[u8]) -> Result<f64> {
    ensure_len(q.size(), x.len())?;
    Ok(q.energy_unchecked(x))
}
