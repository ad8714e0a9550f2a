//! # Cooling Schedules
//!
//! A cooling schedule decides the next temperature after every annealing
//! iteration. The schedule itself is a plain value; the per-run adaptation
//! state (recent acceptance outcomes, recent energies) lives in a [`Cooler`].
//!
//! - **Geometric**: `T ← T·α`. Monotone, easy to reason about.
//! - **LamDelosme**: steers the acceptance ratio of a sliding window towards
//!   roughly 44% by adjusting the effective cooling factor. At high initial
//!   temperatures the ratio sits well above target for a while; that is the
//!   expected transient, and the schedule reacts by cooling faster.
//! - **Huang**: `T ← T·exp(−T·λ/σ)` where σ is the standard deviation of
//!   recent energies. Freezes quickly once σ becomes small compared to `T`.

use std::collections::VecDeque;

/// Number of recent outcomes and energies a `Cooler` remembers.
pub const COOLING_WINDOW: usize = 100;

/// Acceptance ratio the Lam-Delosme schedule steers towards.
pub const LAM_TARGET_ACCEPTANCE: f64 = 0.44;

const LAM_MIN_EXPONENT: f64 = 0.25;
const LAM_MAX_EXPONENT: f64 = 4.0;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoolingSchedule {
    #[default]
    Geometric,
    LamDelosme,
    Huang,
}

/// Per-run state of a cooling schedule.
#[derive(Debug, Clone)]
pub struct Cooler {
    schedule: CoolingSchedule,
    alpha: f64,
    huang_lambda: f64,
    outcomes: VecDeque<bool>,
    accepted_in_window: usize,
    energies: VecDeque<f64>,
}

impl Cooler {
    pub fn new(schedule: CoolingSchedule, alpha: f64, huang_lambda: f64) -> Self {
        Self {
            schedule,
            alpha,
            huang_lambda,
            outcomes: VecDeque::with_capacity(COOLING_WINDOW),
            accepted_in_window: 0,
            energies: VecDeque::with_capacity(COOLING_WINDOW),
        }
    }

    pub fn schedule(&self) -> CoolingSchedule {
        self.schedule
    }

    /// Records the outcome of one iteration and the energy of the current state afterwards.
    ///
    /// Non-finite energies are not added to the energy window.
    pub fn observe(&mut self, accepted: bool, current_energy: f64) {
        if self.outcomes.len() == COOLING_WINDOW {
            if let Some(true) = self.outcomes.pop_front() {
                self.accepted_in_window -= 1;
            }
        }
        self.outcomes.push_back(accepted);
        if accepted {
            self.accepted_in_window += 1;
        }

        if current_energy.is_finite() {
            if self.energies.len() == COOLING_WINDOW {
                self.energies.pop_front();
            }
            self.energies.push_back(current_energy);
        }
    }

    /// Fraction of accepted moves in the window, 0 before the first observation.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.accepted_in_window as f64 / self.outcomes.len() as f64
    }

    /// Population standard deviation of the energy window, if it holds at least two samples.
    pub fn energy_std_dev(&self) -> Option<f64> {
        let n = self.energies.len();
        if n < 2 {
            return None;
        }
        let mean = self.energies.iter().sum::<f64>() / n as f64;
        let variance = self
            .energies
            .iter()
            .map(|e| (e - mean) * (e - mean))
            .sum::<f64>()
            / n as f64;
        Some(variance.sqrt())
    }

    /// Returns the temperature that follows `temperature` under the schedule.
    ///
    /// None of the schedules ever raises the temperature.
    pub fn next_temperature(&self, temperature: f64) -> f64 {
        match self.schedule {
            CoolingSchedule::Geometric => temperature * self.alpha,
            CoolingSchedule::LamDelosme => {
                if self.outcomes.is_empty() {
                    return temperature * self.alpha;
                }
                let exponent = (self.acceptance_ratio() / LAM_TARGET_ACCEPTANCE)
                    .clamp(LAM_MIN_EXPONENT, LAM_MAX_EXPONENT);
                temperature * self.alpha.powf(exponent)
            }
            CoolingSchedule::Huang => match self.energy_std_dev() {
                Some(sigma) if sigma > 0.0 => {
                    temperature * (-temperature * self.huang_lambda / sigma).exp()
                }
                _ => temperature * self.alpha,
            },
        }
    }
}
