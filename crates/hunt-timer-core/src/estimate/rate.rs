//! Kill-rate derivation.
//!
//! A player measures either how many monsters they killed in a sampling
//! window, or how much experience they gained in it. Both are reduced to
//! whole kills (truncated toward zero) and then to kills per minute, which
//! is what the estimator consumes.

use serde::{Deserialize, Serialize};

use crate::error::InsufficientData;

/// Length of the measurement window: one or five minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SamplingWindow(u32);

impl SamplingWindow {
    pub const ONE_MINUTE: SamplingWindow = SamplingWindow(1);
    pub const FIVE_MINUTES: SamplingWindow = SamplingWindow(5);

    pub fn minutes(minutes: u32) -> Result<Self, InsufficientData> {
        match minutes {
            1 => Ok(Self::ONE_MINUTE),
            5 => Ok(Self::FIVE_MINUTES),
            other => Err(InsufficientData::SamplingWindow(other)),
        }
    }

    pub fn as_minutes(self) -> u32 {
        self.0
    }
}

impl Default for SamplingWindow {
    fn default() -> Self {
        Self::ONE_MINUTE
    }
}

impl TryFrom<u32> for SamplingWindow {
    type Error = InsufficientData;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::minutes(minutes)
    }
}

impl From<SamplingWindow> for u32 {
    fn from(window: SamplingWindow) -> Self {
        window.0
    }
}

/// Which measurement the player provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivationStrategy {
    #[default]
    Direct,
    Experience,
}

/// Experience measured over a sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSample {
    pub experience_gained: f64,
    pub experience_per_kill: f64,
}

impl ExperienceSample {
    pub fn new(experience_gained: f64, experience_per_kill: f64) -> Self {
        Self {
            experience_gained,
            experience_per_kill,
        }
    }

    /// Build a sample from the experience bar before and after the window.
    pub fn between(before: f64, after: f64, experience_per_kill: f64) -> Self {
        Self::new(after - before, experience_per_kill)
    }

    /// Whole kills the sample accounts for. Partial kills are dropped.
    pub fn whole_kills(&self) -> Result<u64, InsufficientData> {
        let per_kill = self.experience_per_kill;
        if !per_kill.is_finite() || per_kill <= 0.0 {
            return Err(InsufficientData::ExperiencePerKill(per_kill));
        }
        let gained = self.experience_gained;
        if !gained.is_finite() || gained < 0.0 {
            return Err(InsufficientData::ExperienceGained(gained));
        }
        Ok((gained / per_kill).trunc() as u64)
    }
}

/// Where a kill rate comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KillRateSource {
    /// Kills counted over the window.
    Direct { kills: f64, window: SamplingWindow },
    /// Experience gained over the window, divided by per-kill experience.
    Experience {
        sample: ExperienceSample,
        window: SamplingWindow,
    },
}

impl KillRateSource {
    pub fn strategy(&self) -> DerivationStrategy {
        match self {
            KillRateSource::Direct { .. } => DerivationStrategy::Direct,
            KillRateSource::Experience { .. } => DerivationStrategy::Experience,
        }
    }

    pub fn window(&self) -> SamplingWindow {
        match self {
            KillRateSource::Direct { window, .. } | KillRateSource::Experience { window, .. } => {
                *window
            }
        }
    }

    /// Reduce the measurement to whole kills per window.
    pub fn derive(&self) -> Result<KillRate, InsufficientData> {
        let kills_per_window = match self {
            KillRateSource::Direct { kills, .. } => {
                if !kills.is_finite() || *kills < 0.0 {
                    return Err(InsufficientData::KillRate(*kills));
                }
                kills.trunc() as u64
            }
            KillRateSource::Experience { sample, .. } => sample.whole_kills()?,
        };
        if kills_per_window == 0 {
            return Err(InsufficientData::NoKills);
        }
        Ok(KillRate {
            kills_per_window,
            window: self.window(),
        })
    }
}

/// Whole kills observed per sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRate {
    pub kills_per_window: u64,
    pub window: SamplingWindow,
}

impl KillRate {
    pub fn per_minute(&self) -> f64 {
        self.kills_per_window as f64 / f64::from(self.window.as_minutes())
    }
}
