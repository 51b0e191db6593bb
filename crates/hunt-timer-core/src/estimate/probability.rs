//! Geometric-distribution helpers.
//!
//! All logarithms of `1 - p` go through `ln_1p(-p)` so that tiny drop rates
//! (0.006% and below) keep their precision.

/// `ln(1 - p)`.
pub fn ln_miss(p: f64) -> f64 {
    (-p).ln_1p()
}

/// Probability of at least one drop after `kills` independent kills.
pub fn success_probability(p: f64, kills: u64) -> f64 {
    if !(p > 0.0) || kills == 0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let q = -(kills as f64 * ln_miss(p)).exp_m1();
    q.clamp(0.0, 1.0)
}

/// Real-valued number of kills at which the cumulative drop probability
/// reaches `target`.
///
/// A drop probability of exactly 1.0 short-circuits to a single kill.
pub fn kills_for_confidence(p: f64, target: f64) -> f64 {
    if 1.0 - p == 0.0 {
        return 1.0;
    }
    (1.0 - target).ln() / ln_miss(p)
}

/// Seconds needed to reach `kills` at `kills_per_hour`, clamped to a
/// displayable value.
pub fn seconds_for(kills: f64, kills_per_hour: f64) -> u64 {
    clamp_seconds((kills / kills_per_hour * 3600.0).round())
}

/// NaN, infinities and negatives collapse to 0; huge values saturate.
pub fn clamp_seconds(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_probability_edges() {
        assert_eq!(success_probability(0.0, 100), 0.0);
        assert_eq!(success_probability(0.5, 0), 0.0);
        assert_eq!(success_probability(1.0, 1), 1.0);
        assert!((success_probability(0.5, 2) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn success_probability_tends_to_one_minus_inverse_e() {
        let p = 1e-7;
        let q = success_probability(p, (1.0 / p).round() as u64);
        assert!((q - (1.0 - (-1.0f64).exp())).abs() < 1e-6);
    }

    #[test]
    fn certain_drop_needs_one_kill() {
        assert_eq!(kills_for_confidence(1.0, 0.9), 1.0);
    }

    #[test]
    fn half_chance_ninety_percent_quantile() {
        let n = kills_for_confidence(0.5, 0.9);
        assert!((n - 0.1f64.ln() / 0.5f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn clamp_seconds_rejects_non_finite() {
        assert_eq!(clamp_seconds(f64::NAN), 0);
        assert_eq!(clamp_seconds(f64::INFINITY), 0);
        assert_eq!(clamp_seconds(-3.0), 0);
        assert_eq!(clamp_seconds(1e30), u64::MAX);
        assert_eq!(clamp_seconds(42.0), 42);
    }

    #[test]
    fn seconds_for_zero_rate_is_zero() {
        assert_eq!(seconds_for(10.0, 0.0), 0);
    }
}
