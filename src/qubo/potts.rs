//! Potts models: spins with `k` discrete states.
//!
//! States are carried through the engines as `f64` values holding the state
//! index, so a Potts configuration is an ordinary [`State`].

use crate::energy::{EnergyFunction, NeighborFunction, State};
use crate::error::{ensure_finite, ensure_len, Result, StochoptError};
use crate::rng::RandomNumberGenerator;

use super::scheduling::{validate_events, validate_penalty, Event, Room};

/// Potts model with energy `−Σ_{i<j} J_ij·[s_i = s_j] − Σ_i h_{i,s_i}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PottsModel {
    n: usize,
    k: usize,
    couplings: Vec<f64>,
    field: Vec<f64>,
}

impl PottsModel {
    /// Creates a model of `n` spins with `k` states each, all coefficients zero.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `k == 0`.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(StochoptError::Configuration(
                "A Potts spin needs at least one state".to_string(),
            ));
        }
        Ok(Self {
            n,
            k,
            couplings: vec![0.0; n * n],
            field: vec![0.0; n * k],
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn states(&self) -> usize {
        self.k
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

    pub fn field(&self, i: usize, state: usize) -> f64 {
        self.field[i * self.k + state]
    }

    pub fn set_field(&mut self, i: usize, state: usize, value: f64) {
        self.field[i * self.k + state] = value;
    }

    fn energy_unchecked(&self, spins: impl Fn(usize) -> usize) -> f64 {
        let mut energy = 0.0;
        for i in 0..self.n {
            let s_i = spins(i);
            energy -= self.field(i, s_i);
            for j in i + 1..self.n {
                if spins(j) == s_i {
                    energy -= self.coupling(i, j);
                }
            }
        }
        energy
    }

    fn decode(&self, value: f64) -> usize {
        if value.is_nan() {
            return 0;
        }
        (value.round().max(0.0) as usize).min(self.k - 1)
    }
}

/// Evaluates the Potts energy of `spins`.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `spins.len() != model.size()`, or a
/// `Configuration` error if a spin is not below `model.states()`.
pub fn evaluate_potts(model: &PottsModel, spins: &[usize]) -> Result<f64> {
    ensure_len(model.size(), spins.len())?;
    if let Some((i, &s)) = spins.iter().enumerate().find(|(_, &s)| s >= model.states()) {
        return Err(StochoptError::Configuration(format!(
            "Spin {} is in state {}, but the model has {} states",
            i,
            s,
            model.states()
        )));
    }
    Ok(model.energy_unchecked(|i| spins[i]))
}

/// Builds a room-assignment Potts model: one spin per event, one state per room.
///
/// Any two events in the same room are penalised with `J_ij = −λ`. The field
/// `h_{e,r}` is the event's total preference for room `r` minus
/// `λ·overflow²` when the event does not fit.
///
/// # Errors
///
/// Returns an error if `rooms` is empty, `penalty_weight` is not a positive
/// finite number, or an event carries an invalid preference.
pub fn build_potts_scheduling(
    events: &[Event],
    rooms: &[Room],
    penalty_weight: f64,
) -> Result<PottsModel> {
    validate_penalty(penalty_weight)?;
    validate_events(events, rooms.len())?;

    let mut model = PottsModel::new(events.len(), rooms.len())?;
    let lambda = penalty_weight;
    for (e, event) in events.iter().enumerate() {
        for (r, room) in rooms.iter().enumerate() {
            let h = event.room_preference(r) - lambda * event.overflow_squared(room);
            ensure_finite("Potts field", h)?;
            model.set_field(e, r, h);
        }
        for other in e + 1..events.len() {
            model.set_coupling(e, other, -lambda);
        }
    }
    Ok(model)
}

/// [`EnergyFunction`] view of a [`PottsModel`].
///
/// Each coordinate is rounded and clamped to a valid state index.
#[derive(Debug, Clone, Copy)]
pub struct PottsEnergy<'a> {
    model: &'a PottsModel,
}

impl<'a> PottsEnergy<'a> {
    pub fn new(model: &'a PottsModel) -> Self {
        Self { model }
    }

    /// Converts an engine state back into state indices.
    pub fn decode(&self, state: &[f64]) -> Vec<usize> {
        state.iter().map(|&v| self.model.decode(v)).collect()
    }
}

impl EnergyFunction for PottsEnergy<'_> {
    fn energy(&self, state: &[f64]) -> f64 {
        if state.len() < self.model.size() {
            return f64::INFINITY;
        }
        self.model.energy_unchecked(|i| self.model.decode(state[i]))
    }
}

/// Moves one uniformly chosen spin to a different, uniformly chosen state.
#[derive(Debug, Clone, Copy)]
pub struct PottsReassign {
    states: usize,
}

impl PottsReassign {
    pub fn new(states: usize) -> Self {
        Self { states }
    }
}

impl NeighborFunction for PottsReassign {
    fn neighbor(&self, state: &[f64], rng: &mut RandomNumberGenerator) -> State {
        let mut next = state.to_vec();
        if next.is_empty() || self.states < 2 {
            return next;
        }
        let i = rng.next_index(next.len());
        let current = next[i].round().max(0.0) as usize;
        let mut target = rng.next_index(self.states - 1);
        if target >= current {
            target += 1;
        }
        next[i] = target.min(self.states - 1) as f64;
        next
    }
}
