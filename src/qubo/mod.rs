//! # QUBO, Ising and Potts Encodings
//!
//! Turns constrained combinatorial problems into unconstrained energy
//! functions the engines can minimise, and maps their answers back.
//!
//! - [`QuboMatrix`] stores `Q` as a flat upper triangle; [`evaluate_qubo`]
//!   computes `Σ Q_ii x_i + Σ_{i<j} Q_ij x_i x_j`.
//! - [`qubo_to_ising`] substitutes `x_i = (s_i + 1)/2`; energies agree up to
//!   [`QuboMatrix::ising_offset`].
//! - [`PottsModel`] generalises spins to `k` states.
//! - [`build_scheduling_qubo`] and [`build_potts_scheduling`] encode
//!   event–room–timeslot assignment with penalty terms.
//! - [`solve_qubo_sa`], [`solve_qubo_pt`] and [`solve_potts_sa`] run the
//!   engines on those models.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::qubo::{evaluate_ising, evaluate_qubo, qubo_to_ising, binary_to_spins, QuboMatrix};
//!
//! let mut q = QuboMatrix::new(2);
//! q.set(0, 0, 1.0);
//! q.set(0, 1, -4.0);
//! let model = qubo_to_ising(&q);
//!
//! let x = [1, 1];
//! let e_qubo = evaluate_qubo(&q, &x)?;
//! let e_ising = evaluate_ising(&model, &binary_to_spins(&x))?;
//! assert!((e_qubo - (e_ising + q.ising_offset())).abs() < 1e-12);
//! # Ok::<(), stochopt::error::StochoptError>(())
//! ```

pub mod ising;
pub mod matrix;
pub mod potts;
pub mod scheduling;
pub mod solve;

pub use ising::{
    binary_to_spins, evaluate_ising, qubo_to_ising, spins_to_binary, IsingEnergy, IsingModel,
    SingleSpinFlip,
};
pub use matrix::{evaluate_qubo, QuboMatrix};
pub use potts::{build_potts_scheduling, evaluate_potts, PottsEnergy, PottsModel, PottsReassign};
pub use scheduling::{build_scheduling_qubo, Event, Room, ScheduleViolations, SchedulingLayout};
pub use solve::{solve_potts_sa, solve_qubo_pt, solve_qubo_sa};
