mod estimator;
pub mod probability;
mod rate;

pub use estimator::{estimate, estimate_with, EstimationResult, Milestone, RateObservation};
pub use rate::{DerivationStrategy, ExperienceSample, KillRate, KillRateSource, SamplingWindow};

use serde::{Deserialize, Serialize};

use crate::error::InsufficientData;

/// Estimator parameters shared by every input form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default, rename = "sampling_window_minutes")]
    pub sampling_window: SamplingWindow,
    #[serde(default)]
    pub derivation: DerivationStrategy,
    #[serde(default = "default_confidence_targets")]
    pub confidence_targets: Vec<f64>,
}

fn default_confidence_targets() -> Vec<f64> {
    vec![0.632, 0.90]
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            sampling_window: SamplingWindow::default(),
            derivation: DerivationStrategy::default(),
            confidence_targets: default_confidence_targets(),
        }
    }
}

/// An estimate together with the kill rate it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntPlan {
    pub kill_rate: KillRate,
    pub estimate: EstimationResult,
}

/// Derive the kill rate from `source` and estimate the hunt.
pub fn plan(
    config: &EstimatorConfig,
    drop_probability: f64,
    source: &KillRateSource,
) -> Result<HuntPlan, InsufficientData> {
    // Check the drop rate first so a missing rate is reported before kills.
    RateObservation::new(drop_probability, 1.0).validate()?;
    let kill_rate = source.derive()?;
    let estimate = estimate_with(
        config,
        RateObservation::new(drop_probability, kill_rate.per_minute()),
    )?;
    Ok(HuntPlan {
        kill_rate,
        estimate,
    })
}
