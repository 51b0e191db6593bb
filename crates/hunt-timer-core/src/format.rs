//! Display helpers for durations and percentages.

use serde::{Deserialize, Serialize};

/// A duration split into clock parts, plus its Korean display label
/// (`"5시간 33분 20초"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub label: String,
}

impl DurationParts {
    pub fn from_seconds(total_seconds: u64) -> Self {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        Self {
            hours,
            minutes,
            seconds,
            label: format!("{hours}시간 {minutes:02}분 {seconds:02}초"),
        }
    }
}

pub fn format_duration(total_seconds: u64) -> String {
    DurationParts::from_seconds(total_seconds).label
}

/// `0.632 -> "63.2%"`.
pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", fraction * 100.0)
}

/// Parse a user-typed percentage (`"0.006"`, `"0.006%"`) into a fraction.
///
/// Returns `None` for anything that is not a finite number. Range checks are
/// left to the estimator.
pub fn parse_percent(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let value: f64 = number.parse().ok()?;
    value.is_finite().then_some(value / 100.0)
}
