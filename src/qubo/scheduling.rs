//! # Event–Room–Timeslot Scheduling
//!
//! Encodes the assignment of events to (room, timeslot) pairs as a QUBO.
//! There is one binary variable per `(event, room, slot)` triple, laid out
//! by [`SchedulingLayout`]. The energy combines, all scaled by a single
//! `penalty_weight` λ:
//!
//! - **Preference**: `−preference(e, r, t)` on the diagonal, so minimising
//!   energy maximises preference.
//! - **One-hot**: each event takes exactly one pair. `λ·(Σx − 1)²` expands,
//!   using `x² = x` and dropping the constant, to `−λ·Σx_v + 2λ·Σ_{v<w} x_v x_w`.
//! - **No conflict**: `+λ·x_{e1} x_{e2}` for two events in the same room and slot.
//! - **Capacity**: `+λ·overflow²` on the diagonal when an event has more
//!   attendees than the room seats.
//!
//! ## Example
//!
//! ```rust
//! use stochopt::qubo::{build_scheduling_qubo, evaluate_qubo, Event, Room, SchedulingLayout};
//!
//! let events = vec![Event::new(10).with_preference(0, 1, 2.0), Event::new(30)];
//! let rooms = vec![Room::new(20), Room::new(40)];
//! let q = build_scheduling_qubo(&events, &rooms, 2, 5.0)?;
//!
//! let layout = SchedulingLayout::new(2, 2, 2);
//! assert_eq!(q.size(), layout.num_variables());
//!
//! let mut x = vec![0u8; layout.num_variables()];
//! x[layout.variable(0, 0, 1)] = 1;
//! x[layout.variable(1, 1, 0)] = 1;
//! // Both one-hot terms are satisfied (−λ each) and event 0 gets its preference.
//! assert_eq!(evaluate_qubo(&q, &x)?, -12.0);
//! # Ok::<(), stochopt::error::StochoptError>(())
//! ```

use crate::error::{ensure_finite, ensure_len, Result, StochoptError};

use super::matrix::QuboMatrix;

/// An event to be placed in one room at one timeslot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    pub attendees: u32,
    preferences: Vec<(usize, usize, f64)>,
}

impl Event {
    pub fn new(attendees: u32) -> Self {
        Self {
            attendees,
            preferences: Vec::new(),
        }
    }

    /// Adds `weight` to the preference for `(room, slot)`. Weights accumulate.
    pub fn with_preference(mut self, room: usize, slot: usize, weight: f64) -> Self {
        self.preferences.push((room, slot, weight));
        self
    }

    /// Total preference for `(room, slot)`, 0 when none was given.
    pub fn preference(&self, room: usize, slot: usize) -> f64 {
        self.preferences
            .iter()
            .filter(|&&(r, t, _)| r == room && t == slot)
            .map(|&(_, _, w)| w)
            .sum()
    }

    /// Total preference for `room` over all slots.
    pub fn room_preference(&self, room: usize) -> f64 {
        self.preferences
            .iter()
            .filter(|&&(r, _, _)| r == room)
            .map(|&(_, _, w)| w)
            .sum()
    }

    /// Squared number of attendees that do not fit into `room`.
    pub fn overflow_squared(&self, room: &Room) -> f64 {
        let overflow = f64::from(self.attendees.saturating_sub(room.capacity));
        overflow * overflow
    }

    fn validate(&self, index: usize, rooms: usize, slots: Option<usize>) -> Result<()> {
        for &(r, t, w) in &self.preferences {
            ensure_finite("preference weight", w)?;
            let slot_out_of_range = slots.is_some_and(|slots| t >= slots);
            if r >= rooms || slot_out_of_range {
                return Err(StochoptError::Configuration(format!(
                    "Event {} prefers room {} slot {}, which does not exist",
                    index, r, t
                )));
            }
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Room {
    pub capacity: u32,
}

impl Room {
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }
}

/// Maps `(event, room, slot)` triples to QUBO variable indices `e·R·T + r·T + t`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingLayout {
    events: usize,
    rooms: usize,
    slots: usize,
}

/// Constraint violations of a decoded schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleViolations {
    /// Events with no variable set.
    pub unassigned: usize,
    /// Events with more than one variable set.
    pub multiply_assigned: usize,
    /// Pairs of events sharing a room and slot.
    pub conflicts: usize,
}

impl ScheduleViolations {
    pub fn is_feasible(&self) -> bool {
        self.unassigned == 0 && self.multiply_assigned == 0 && self.conflicts == 0
    }
}

impl SchedulingLayout {
    pub fn new(events: usize, rooms: usize, slots: usize) -> Self {
        Self {
            events,
            rooms,
            slots,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.events * self.rooms * self.slots
    }

    pub fn variable(&self, event: usize, room: usize, slot: usize) -> usize {
        (event * self.rooms + room) * self.slots + slot
    }

    /// Inverse of [`SchedulingLayout::variable`].
    pub fn locate(&self, variable: usize) -> (usize, usize, usize) {
        let slot = variable % self.slots;
        let rest = variable / self.slots;
        (rest / self.rooms, rest % self.rooms, slot)
    }

    /// The contiguous variable range owned by `event`.
    pub fn event_range(&self, event: usize) -> std::ops::Range<usize> {
        let width = self.rooms * self.slots;
        event * width..(event + 1) * width
    }

    /// Returns each event's first chosen `(room, slot)`, or `None` when unassigned.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` does not have `num_variables()` entries.
    pub fn decode(&self, x: &[u8]) -> Result<Vec<Option<(usize, usize)>>> {
        ensure_len(self.num_variables(), x.len())?;
        Ok((0..self.events)
            .map(|e| {
                self.event_range(e)
                    .find(|&v| x[v] != 0)
                    .map(|v| {
                        let (_, room, slot) = self.locate(v);
                        (room, slot)
                    })
            })
            .collect())
    }

    /// Counts one-hot and conflict violations in `x`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` does not have `num_variables()` entries.
    pub fn violations(&self, x: &[u8]) -> Result<ScheduleViolations> {
        ensure_len(self.num_variables(), x.len())?;
        let mut violations = ScheduleViolations::default();
        for e in 0..self.events {
            match self.event_range(e).filter(|&v| x[v] != 0).count() {
                0 => violations.unassigned += 1,
                1 => {}
                _ => violations.multiply_assigned += 1,
            }
        }
        for r in 0..self.rooms {
            for t in 0..self.slots {
                let occupants = (0..self.events)
                    .filter(|&e| x[self.variable(e, r, t)] != 0)
                    .count();
                violations.conflicts += occupants * occupants.saturating_sub(1) / 2;
            }
        }
        Ok(violations)
    }
}

/// Builds the scheduling QUBO over `events × rooms × n_slots` binary variables.
///
/// # Errors
///
/// Returns an error if `penalty_weight` is not a positive finite number, or an
/// event carries a non-finite preference or one naming a room or slot that
/// does not exist.
pub fn build_scheduling_qubo(
    events: &[Event],
    rooms: &[Room],
    n_slots: usize,
    penalty_weight: f64,
) -> Result<QuboMatrix> {
    validate_penalty(penalty_weight)?;
    for (i, event) in events.iter().enumerate() {
        event.validate(i, rooms.len(), Some(n_slots))?;
    }

    let layout = SchedulingLayout::new(events.len(), rooms.len(), n_slots);
    let mut q = QuboMatrix::new(layout.num_variables());
    let lambda = penalty_weight;

    for (e, event) in events.iter().enumerate() {
        for (r, room) in rooms.iter().enumerate() {
            let capacity_penalty = lambda * event.overflow_squared(room);
            for t in 0..n_slots {
                let v = layout.variable(e, r, t);
                q.add(v, v, -event.preference(r, t) - lambda + capacity_penalty);
            }
        }

        let owned = layout.event_range(e);
        for v in owned.clone() {
            for w in v + 1..owned.end {
                q.add(v, w, 2.0 * lambda);
            }
        }
    }

    for r in 0..rooms.len() {
        for t in 0..n_slots {
            for e1 in 0..events.len() {
                for e2 in e1 + 1..events.len() {
                    q.add(layout.variable(e1, r, t), layout.variable(e2, r, t), lambda);
                }
            }
        }
    }

    Ok(q)
}

pub(crate) fn validate_penalty(penalty_weight: f64) -> Result<()> {
    ensure_finite("penalty_weight", penalty_weight)?;
    if penalty_weight <= 0.0 {
        return Err(StochoptError::Configuration(
            "Penalty weight must be positive".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_events(events: &[Event], rooms: usize) -> Result<()> {
    for (i, event) in events.iter().enumerate() {
        event.validate(i, rooms, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubo::matrix::evaluate_qubo;

    #[test]
    fn test_layout_round_trip() {
        let layout = SchedulingLayout::new(3, 4, 5);
        assert_eq!(layout.num_variables(), 60);
        for v in 0..layout.num_variables() {
            let (e, r, t) = layout.locate(v);
            assert_eq!(layout.variable(e, r, t), v);
        }
        assert_eq!(layout.event_range(1), 20..40);
    }

    #[test]
    fn test_one_hot_terms() {
        // One event, one room, two slots, no preference.
        let q = build_scheduling_qubo(&[Event::new(1)], &[Room::new(10)], 2, 3.0).unwrap();
        assert_eq!(q.get(0, 0), -3.0);
        assert_eq!(q.get(1, 1), -3.0);
        assert_eq!(q.get(0, 1), 6.0);

        assert_eq!(evaluate_qubo(&q, &[0, 0]).unwrap(), 0.0);
        assert_eq!(evaluate_qubo(&q, &[1, 0]).unwrap(), -3.0);
        assert_eq!(evaluate_qubo(&q, &[1, 1]).unwrap(), 0.0);
    }

    #[test]
    fn test_conflict_terms() {
        let events = [Event::new(1), Event::new(1)];
        let q = build_scheduling_qubo(&events, &[Room::new(10)], 1, 2.0).unwrap();
        // variables: (e0, r0, t0) = 0, (e1, r0, t0) = 1
        assert_eq!(q.get(0, 1), 2.0);
        assert_eq!(evaluate_qubo(&q, &[1, 1]).unwrap(), -2.0);
        assert_eq!(evaluate_qubo(&q, &[1, 0]).unwrap(), -2.0);
    }

    #[test]
    fn test_capacity_and_preference_terms() {
        let events = [Event::new(12).with_preference(0, 0, 1.5)];
        let q = build_scheduling_qubo(&events, &[Room::new(10), Room::new(20)], 1, 0.5).unwrap();
        // room 0 overflows by 2: -1.5 - 0.5 + 0.5 * 4
        assert_eq!(q.get(0, 0), 0.0);
        // room 1 fits: -0.5
        assert_eq!(q.get(1, 1), -0.5);
    }

    #[test]
    fn test_invalid_inputs() {
        let rooms = [Room::new(10)];
        assert!(build_scheduling_qubo(&[Event::new(1)], &rooms, 1, 0.0).is_err());
        assert!(build_scheduling_qubo(&[Event::new(1)], &rooms, 1, f64::NAN).is_err());
        let bad_room = Event::new(1).with_preference(3, 0, 1.0);
        assert!(build_scheduling_qubo(&[bad_room], &rooms, 1, 1.0).is_err());
        let bad_slot = Event::new(1).with_preference(0, 2, 1.0);
        assert!(build_scheduling_qubo(&[bad_slot], &rooms, 1, 1.0).is_err());
        let bad_weight = Event::new(1).with_preference(0, 0, f64::INFINITY);
        assert!(build_scheduling_qubo(&[bad_weight], &rooms, 1, 1.0).is_err());
    }

    #[test]
    fn test_decode_and_violations() {
        let layout = SchedulingLayout::new(3, 2, 2);
        let mut x = vec![0u8; layout.num_variables()];
        x[layout.variable(0, 1, 0)] = 1;
        x[layout.variable(1, 1, 0)] = 1;
        x[layout.variable(1, 0, 1)] = 1;

        let decoded = layout.decode(&x).unwrap();
        assert_eq!(decoded, vec![Some((1, 0)), Some((0, 1)), None]);

        let violations = layout.violations(&x).unwrap();
        assert_eq!(
            violations,
            ScheduleViolations {
                unassigned: 1,
                multiply_assigned: 1,
                conflicts: 1,
            }
        );
        assert!(!violations.is_feasible());
        assert!(layout.decode(&x[1..]).is_err());
    }

    #[test]
    fn test_preferences_accumulate() {
        let event = Event::new(1)
            .with_preference(0, 0, 1.0)
            .with_preference(0, 0, 0.5)
            .with_preference(0, 1, 2.0);
        assert_eq!(event.preference(0, 0), 1.5);
        assert_eq!(event.room_preference(0), 3.5);
        assert_eq!(event.room_preference(1), 0.0);
    }
}
