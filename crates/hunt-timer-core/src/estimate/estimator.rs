//! Expected-time-to-drop estimation.
//!
//! Drops are modelled as independent Bernoulli trials per kill, so the
//! number of kills until the first drop is geometric with mean `1 / p`.
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use super::probability::{kills_for_confidence, seconds_for, success_probability};
use super::EstimatorConfig;
use crate::error::InsufficientData;

const MINUTES_PER_HOUR: f64 = 60.0;
const NINETY_PERCENT: f64 = 0.90;

/// Estimator input: per-kill drop chance and kills per minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub drop_probability: f64,
    pub kill_rate: f64,
}

impl RateObservation {
    pub fn new(drop_probability: f64, kill_rate: f64) -> Self {
        Self {
            drop_probability,
            kill_rate,
        }
    }

    pub fn validate(&self) -> Result<(), InsufficientData> {
        let p = self.drop_probability;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(InsufficientData::DropProbability(p));
        }
        let k = self.kill_rate;
        if !k.is_finite() || k <= 0.0 {
            return Err(InsufficientData::KillRate(k));
        }
        Ok(())
    }
}

/// Kills and hunting time needed to reach a cumulative drop probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub target: f64,
    pub kills: u64,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub expected_kills: u64,
    /// Kills per minute, as observed.
    pub kill_rate: f64,
    pub kills_per_hour: f64,
    pub seconds_to_expected: u64,
    pub seconds_to_90_percent: u64,
    pub probability_at_expected: f64,
    pub milestones: Vec<Milestone>,
}

impl EstimationResult {
    pub fn milestone(&self, target: f64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.target == target)
    }
}

/// Estimate with the default confidence targets.
pub fn estimate(
    drop_probability: f64,
    kill_rate: f64,
) -> Result<EstimationResult, InsufficientData> {
    estimate_with(
        &EstimatorConfig::default(),
        RateObservation::new(drop_probability, kill_rate),
    )
}

/// Estimate with the confidence targets from `config`.
pub fn estimate_with(
    config: &EstimatorConfig,
    observation: RateObservation,
) -> Result<EstimationResult, InsufficientData> {
    observation.validate()?;
    let p = observation.drop_probability;

    let expected_kills = ((1.0 / p).round() as u64).max(1);
    let kills_per_hour = observation.kill_rate * MINUTES_PER_HOUR;

    let seconds_to_expected = seconds_for(expected_kills as f64, kills_per_hour);
    let seconds_to_90_percent =
        seconds_for(kills_for_confidence(p, NINETY_PERCENT), kills_per_hour);

    let milestones = config
        .confidence_targets
        .iter()
        .copied()
        .filter(|t| t.is_finite() && *t > 0.0 && *t < 1.0)
        .map(|target| {
            let n = kills_for_confidence(p, target);
            Milestone {
                target,
                kills: (n.ceil() as u64).max(1),
                seconds: seconds_for(n, kills_per_hour),
            }
        })
        .collect();

    Ok(EstimationResult {
        expected_kills,
        kill_rate: observation.kill_rate,
        kills_per_hour,
        seconds_to_expected,
        seconds_to_90_percent,
        probability_at_expected: success_probability(p, expected_kills),
        milestones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_at_six_thousandths_of_a_percent() {
        let r = estimate(0.00006, 50.0).unwrap();
        assert_eq!(r.expected_kills, 16_667);
        assert_eq!(r.kills_per_hour, 3_000.0);
        assert_eq!(r.seconds_to_expected, 20_000);
    }

    #[test]
    fn zero_probability_is_insufficient() {
        assert_eq!(
            estimate(0.0, 50.0),
            Err(InsufficientData::DropProbability(0.0))
        );
    }

    #[test]
    fn invalid_inputs_are_insufficient() {
        assert!(estimate(-0.1, 50.0).is_err());
        assert!(estimate(1.5, 50.0).is_err());
        assert!(estimate(f64::NAN, 50.0).is_err());
        assert!(estimate(0.1, 0.0).is_err());
        assert!(estimate(0.1, -3.0).is_err());
        assert!(estimate(0.1, f64::INFINITY).is_err());
    }

    #[test]
    fn certain_drop() {
        let r = estimate(1.0, 60.0).unwrap();
        assert_eq!(r.expected_kills, 1);
        assert_eq!(r.probability_at_expected, 1.0);
        // one kill at one kill per second
        assert_eq!(r.seconds_to_expected, 1);
        assert_eq!(r.seconds_to_90_percent, 1);
    }

    #[test]
    fn ninety_percent_takes_longer_for_rare_drops() {
        let r = estimate(0.0001, 10.0).unwrap();
        assert!(r.seconds_to_90_percent > r.seconds_to_expected);
    }

    #[test]
    fn default_milestones() {
        let r = estimate(0.01, 10.0).unwrap();
        assert_eq!(r.milestones.len(), 2);
        let ninety = r.milestone(0.9).unwrap();
        assert_eq!(ninety.seconds, r.seconds_to_90_percent);
        // 1 - 0.99^230 < 0.9 <= 1 - 0.99^230 with ceil
        assert_eq!(ninety.kills, 230);
    }

    #[test]
    fn out_of_range_targets_skipped() {
        let config = EstimatorConfig {
            confidence_targets: vec![0.0, 0.5, 1.0, f64::NAN],
            ..EstimatorConfig::default()
        };
        let r = estimate_with(&config, RateObservation::new(0.1, 1.0)).unwrap();
        assert_eq!(r.milestones.len(), 1);
        assert_eq!(r.milestones[0].target, 0.5);
    }

    #[test]
    fn same_input_same_bits() {
        let a = estimate(0.000123, 37.5).unwrap();
        let b = estimate(0.000123, 37.5).unwrap();
        assert_eq!(
            a.probability_at_expected.to_bits(),
            b.probability_at_expected.to_bits()
        );
        assert_eq!(a, b);
    }
}
