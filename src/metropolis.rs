//! Acceptance rules shared by the annealing and tempering engines.

use crate::rng::RandomNumberGenerator;

/// Metropolis criterion for a single chain at `temperature`.
///
/// A candidate with non-finite energy is never accepted. A finite candidate
/// always replaces a non-finite current state. Otherwise the move is accepted
/// when it lowers the energy, or with probability `exp(-ΔE / T)`. The
/// generator is only consulted for non-improving moves.
pub fn metropolis_accept(
    current: f64,
    candidate: f64,
    temperature: f64,
    rng: &mut RandomNumberGenerator,
) -> bool {
    if !candidate.is_finite() {
        return false;
    }
    if !current.is_finite() {
        return true;
    }
    let delta = candidate - current;
    if delta < 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.next_f64() < (-delta / temperature).exp()
}

/// Replica-exchange criterion for two chains at temperatures `t_i < t_j`.
///
/// With `Δ = (1/T_i − 1/T_j)·(E_i − E_j)` the swap is accepted when `Δ > 0`,
/// otherwise with probability `exp(Δ)`. An undefined `Δ` (both energies
/// infinite) rejects the swap without drawing.
pub fn exchange_accept(
    t_i: f64,
    t_j: f64,
    e_i: f64,
    e_j: f64,
    rng: &mut RandomNumberGenerator,
) -> bool {
    let delta = (1.0 / t_i - 1.0 / t_j) * (e_i - e_j);
    if delta.is_nan() {
        return false;
    }
    if delta > 0.0 {
        return true;
    }
    rng.next_f64() < delta.exp()
}

/// Returns true when `candidate` should replace `best` in a best-ever tracker.
pub fn improves_on(candidate: f64, best: f64) -> bool {
    candidate.is_finite() && (!best.is_finite() || candidate < best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improving_move_always_accepted() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        for _ in 0..100 {
            assert!(metropolis_accept(5.0, 4.0, 1e-9, &mut rng));
        }
    }

    #[test]
    fn test_improving_move_does_not_draw() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let mut reference = rng.clone();
        metropolis_accept(5.0, 4.0, 1.0, &mut rng);
        assert_eq!(rng.next_u64(), reference.next_u64());
    }

    #[test]
    fn test_non_finite_candidate_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(!metropolis_accept(1.0, f64::NAN, 1e9, &mut rng));
        assert!(!metropolis_accept(1.0, f64::INFINITY, 1e9, &mut rng));
        assert!(!metropolis_accept(1.0, f64::NEG_INFINITY, 1e9, &mut rng));
    }

    #[test]
    fn test_finite_candidate_replaces_non_finite_current() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(metropolis_accept(f64::NAN, 100.0, 1.0, &mut rng));
        assert!(metropolis_accept(f64::INFINITY, 100.0, 1.0, &mut rng));
    }

    #[test]
    fn test_uphill_acceptance_rate_matches_boltzmann_factor() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        let trials = 20_000;
        let accepted = (0..trials)
            .filter(|_| metropolis_accept(0.0, 1.0, 1.0, &mut rng))
            .count();
        let rate = accepted as f64 / trials as f64;
        let expected = (-1.0f64).exp();
        assert!((rate - expected).abs() < 0.02, "rate {}", rate);
    }

    #[test]
    fn test_zero_temperature_rejects_uphill() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(!metropolis_accept(0.0, 1.0, 0.0, &mut rng));
    }

    #[test]
    fn test_exchange_accepts_when_cold_is_worse() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(exchange_accept(1.0, 10.0, 5.0, 1.0, &mut rng));
    }

    #[test]
    fn test_exchange_probability_when_cold_is_better() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        // Δ = (1 - 0.5) * (0 - 2) = -1
        let trials = 20_000;
        let accepted = (0..trials)
            .filter(|_| exchange_accept(1.0, 2.0, 0.0, 2.0, &mut rng))
            .count();
        let rate = accepted as f64 / trials as f64;
        assert!((rate - (-1.0f64).exp()).abs() < 0.02, "rate {}", rate);
    }

    #[test]
    fn test_exchange_with_infinite_energies() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(exchange_accept(1.0, 2.0, f64::INFINITY, 0.0, &mut rng));
        assert!(!exchange_accept(1.0, 2.0, f64::INFINITY, f64::INFINITY, &mut rng));
    }

    #[test]
    fn test_improves_on() {
        assert!(improves_on(1.0, 2.0));
        assert!(!improves_on(2.0, 2.0));
        assert!(improves_on(1e9, f64::INFINITY));
        assert!(improves_on(1e9, f64::NAN));
        assert!(!improves_on(f64::NAN, 2.0));
    }
}
