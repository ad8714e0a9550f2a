//! # Energy and Neighbor Functions
//!
//! The engines know nothing about the problem they minimise. Callers describe
//! it through two traits:
//!
//! - [`EnergyFunction`] maps a state to a real number, lower is better.
//! - [`NeighborFunction`] proposes a small perturbation of a state, drawing any
//!   randomness from the supplied [`RandomNumberGenerator`].
//!
//! Both traits are implemented for plain closures, so most call sites never
//! name a type:
//!
//! ```rust
//! use stochopt::energy::{EnergyFunction, NeighborFunction};
//! use stochopt::rng::RandomNumberGenerator;
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! let nudge = |x: &[f64], rng: &mut RandomNumberGenerator| {
//!     let mut next = x.to_vec();
//!     let i = rng.next_index(next.len());
//!     next[i] += rng.uniform(-0.5, 0.5);
//!     next
//! };
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let start = vec![1.0, 2.0];
//! assert_eq!(sphere.energy(&start), 5.0);
//! assert_eq!(nudge.neighbor(&start, &mut rng).len(), 2);
//! ```

use crate::error::{ensure_finite, ensure_len, Result, StochoptError};
use crate::rng::RandomNumberGenerator;

/// A fixed-length vector of optimisation variables.
pub type State = Vec<f64>;

/// Maps a state to its energy. Lower is better.
///
/// Implementations are called millions of times per run and must not rely on
/// side effects. A non-finite return value is allowed; the engines treat such
/// a state as infinitely bad.
pub trait EnergyFunction {
    fn energy(&self, state: &[f64]) -> f64;
}

impl<F> EnergyFunction for F
where
    F: Fn(&[f64]) -> f64,
{
    fn energy(&self, state: &[f64]) -> f64 {
        self(state)
    }
}

/// Proposes a candidate state near `state`.
///
/// The returned buffer is always owned by the caller; it never aliases the input.
pub trait NeighborFunction {
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State;
}

impl<F> NeighborFunction for F
where
    F: Fn(&[f64], &mut RandomNumberGenerator) -> State,
{
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State {
        self(state, rng)
    }
}

/// Moves one randomly chosen coordinate by a uniform offset in `[-step, step)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPerturbation {
    step: f64,
}

impl UniformPerturbation {
    /// Creates a new perturbation with the given step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not a positive finite number.
    pub fn new(step: f64) -> Result<Self> {
        ensure_finite("step", step)?;
        if step <= 0.0 {
            return Err(StochoptError::Configuration(
                "Perturbation step must be positive".to_string(),
            ));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl NeighborFunction for UniformPerturbation {
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State {
        let mut next = state.to_vec();
        if next.is_empty() {
            return next;
        }
        let i = rng.next_index(next.len());
        next[i] += rng.uniform(-self.step, self.step);
        next
    }
}

/// Like [`UniformPerturbation`], but clamps the moved coordinate into per-coordinate bounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPerturbation {
    step: f64,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoundedPerturbation {
    /// Creates a new bounded perturbation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `step` is not a positive finite number
    /// - `lower` and `upper` have different lengths
    /// - any `lower[i] > upper[i]` or a bound is NaN
    pub fn new(step: f64, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        let UniformPerturbation { step } = UniformPerturbation::new(step)?;
        ensure_len(lower.len(), upper.len())?;
        for (i, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(StochoptError::Configuration(format!(
                    "Invalid bounds for coordinate {}: [{}, {}]",
                    i, lo, hi
                )));
            }
        }
        Ok(Self { step, lower, upper })
    }

    /// Returns `state` with every coordinate clamped into the bounds.
    ///
    /// Coordinates beyond the length of the bounds are left untouched.
    pub fn project(&self, state: &[f64]) -> State {
        state
            .iter()
            .enumerate()
            .map(|(i, &x)| match (self.lower.get(i), self.upper.get(i)) {
                (Some(&lo), Some(&hi)) => x.clamp(lo, hi),
                _ => x,
            })
            .collect()
    }
}

impl NeighborFunction for BoundedPerturbation {
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State {
        let mut next = state.to_vec();
        if next.is_empty() {
            return next;
        }
        let i = rng.next_index(next.len());
        let moved = next[i] + rng.uniform(-self.step, self.step);
        next[i] = match (self.lower.get(i), self.upper.get(i)) {
            (Some(&lo), Some(&hi)) => moved.clamp(lo, hi),
            _ => moved,
        };
        next
    }
}
