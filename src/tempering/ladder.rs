//! Temperature ladder construction and adaptation.

/// Rounds between two adaptations of an adaptive ladder.
pub const ADAPT_INTERVAL: usize = 10;

/// Swap acceptance rate adaptive spacing steers towards.
pub const TARGET_SWAP_RATE: f64 = 0.234;

/// Rates within this distance of the target leave the temperature alone.
pub const ADAPT_TOLERANCE: f64 = 0.05;

/// Fraction of the distance to its goal a temperature moves per adaptation.
pub const ADAPT_STEP: f64 = 0.1;

/// Geometric ladder `T_i = t_min·(t_max/t_min)^(i/(n−1))`, ascending.
///
/// The endpoints are exactly `t_min` and `t_max`. A single rung is `[t_min]`.
pub fn geometric_ladder(t_min: f64, t_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![t_min],
        _ => {
            let ratio = t_max / t_min;
            let last = (n - 1) as f64;
            let mut temps: Vec<f64> = (0..n)
                .map(|i| t_min * ratio.powf(i as f64 / last))
                .collect();
            temps[n - 1] = t_max;
            temps
        }
    }
}

/// Moves interior temperatures towards a swap rate of [`TARGET_SWAP_RATE`].
///
/// `pair_rates[i]` is the recent acceptance rate of swaps between rungs `i`
/// and `i + 1`. A rung's own rate is the mean of its two adjacent pairs. When
/// that rate is too low the rung is pulled towards the geometric mean of its
/// neighbours; when it is too high it is pushed towards whichever neighbour is
/// farther away in log-temperature. Rungs are updated in ascending order
/// against the already-updated lower neighbour, so the ladder stays strictly
/// increasing and the endpoints never move.
///
/// Returns the number of rungs that moved.
pub fn adapt_ladder(temps: &mut [f64], pair_rates: &[f64]) -> usize {
    let n = temps.len();
    if n < 3 || pair_rates.len() + 1 != n {
        return 0;
    }

    let mut moved = 0;
    for i in 1..n - 1 {
        let lo = temps[i - 1];
        let hi = temps[i + 1];
        let t = temps[i];
        let rate = (pair_rates[i - 1] + pair_rates[i]) / 2.0;

        let goal = if rate < TARGET_SWAP_RATE - ADAPT_TOLERANCE {
            (lo * hi).sqrt()
        } else if rate > TARGET_SWAP_RATE + ADAPT_TOLERANCE {
            if (t / lo).ln() > (hi / t).ln() {
                lo
            } else {
                hi
            }
        } else {
            continue;
        };

        let next = t + ADAPT_STEP * (goal - t);
        if next > lo && next < hi && next != t {
            temps[i] = next;
            moved += 1;
        }
    }
    moved
}

/// Returns true if `temps` is strictly increasing.
pub fn is_strictly_increasing(temps: &[f64]) -> bool {
    temps.windows(2).all(|w| w[0] < w[1])
}
