//! Property tests for the drop-time estimator.

use hunt_timer_core::{
    estimate, estimate_with, plan, EstimatorConfig, ExperienceSample, InsufficientData,
    KillRateSource, RateObservation, SamplingWindow,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn expected_kills_is_rounded_mean(p in 1e-7f64..=1.0, k in 0.01f64..10_000.0) {
        let r = estimate(p, k).unwrap();
        prop_assert_eq!(r.expected_kills, (1.0 / p).round() as u64);
    }

    #[test]
    fn probability_at_expected_is_a_probability(p in 1e-9f64..=1.0, k in 0.01f64..1_000.0) {
        let r = estimate(p, k).unwrap();
        prop_assert!(r.probability_at_expected > 0.0);
        prop_assert!(r.probability_at_expected <= 1.0);
    }

    #[test]
    fn estimate_is_deterministic(p in 1e-9f64..=1.0, k in 0.01f64..1_000.0) {
        let a = estimate(p, k).unwrap();
        let b = estimate(p, k).unwrap();
        prop_assert_eq!(a.probability_at_expected.to_bits(), b.probability_at_expected.to_bits());
        prop_assert_eq!(a.kills_per_hour.to_bits(), b.kills_per_hour.to_bits());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn ninety_percent_beyond_mean_for_small_p(p in 1e-6f64..0.01, k in 1.0f64..1_000.0) {
        let r = estimate(p, k).unwrap();
        prop_assert!(r.seconds_to_90_percent >= r.seconds_to_expected);
    }

    #[test]
    fn non_positive_inputs_never_panic(p in -1.0f64..=0.0, k in -100.0f64..100.0) {
        prop_assert_eq!(estimate(p, k), Err(InsufficientData::DropProbability(p)));
    }

    #[test]
    fn milestones_grow_with_target(p in 1e-6f64..0.5, k in 1.0f64..1_000.0) {
        let config = EstimatorConfig {
            confidence_targets: vec![0.5, 0.632, 0.9, 0.99],
            ..EstimatorConfig::default()
        };
        let r = estimate_with(&config, RateObservation::new(p, k)).unwrap();
        for pair in r.milestones.windows(2) {
            prop_assert!(pair[0].kills <= pair[1].kills);
            prop_assert!(pair[0].seconds <= pair[1].seconds);
        }
    }
}

#[test]
fn probability_at_expected_near_limit() {
    let r = estimate(1e-6, 10.0).unwrap();
    assert!((r.probability_at_expected - 0.632).abs() < 0.001);
}

#[test]
fn probability_at_expected_approaches_one_monotonically() {
    let mut last = 0.0;
    // above 2/3 the expected kill count rounds to 1
    for p in [0.7, 0.8, 0.9, 0.99, 0.999_999] {
        let q = estimate(p, 1.0).unwrap().probability_at_expected;
        assert!(q >= last, "p={p}: {q} < {last}");
        assert!(q <= 1.0);
        last = q;
    }
}

#[test]
fn rare_drop_ninety_percent_is_later_than_expected() {
    let r = estimate(0.0001, 25.0).unwrap();
    assert!(r.seconds_to_90_percent > r.seconds_to_expected);
}

#[test]
fn literal_scroll_scenario() {
    let r = estimate(0.00006, 50.0).unwrap();
    assert_eq!(r.expected_kills, 16_667);
    assert_eq!(r.kills_per_hour, 3_000.0);
    assert_eq!(r.seconds_to_expected, 20_000);
}

#[test]
fn zero_drop_rate_is_insufficient() {
    for k in [0.0, 1.0, 50.0, f64::NAN] {
        assert!(matches!(
            estimate(0.0, k),
            Err(InsufficientData::DropProbability(_))
        ));
    }
}

#[test]
fn huge_kill_rate_clamps_to_zero_seconds() {
    let r = estimate(0.5, f64::MAX).unwrap();
    assert_eq!(r.seconds_to_expected, 0);
    assert_eq!(r.seconds_to_90_percent, 0);
}

#[test]
fn experience_plan_matches_direct_plan() {
    let config = EstimatorConfig::default();
    let by_xp = plan(
        &config,
        0.00006,
        &KillRateSource::Experience {
            sample: ExperienceSample::between(10_000.0, 15_799.0, 115.0),
            window: SamplingWindow::ONE_MINUTE,
        },
    )
    .unwrap();
    let direct = plan(
        &config,
        0.00006,
        &KillRateSource::Direct {
            kills: 50.0,
            window: SamplingWindow::ONE_MINUTE,
        },
    )
    .unwrap();
    // 5799 / 115 = 50.4 -> 50 whole kills
    assert_eq!(by_xp, direct);
}
