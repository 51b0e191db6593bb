use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_PREFIX: &str = "hunt_timer_";
const FALLBACK_LABEL: &str = "item";

/// Identity of a persisted timer, derived from the item/goal label.
///
/// Two labels that sanitize to the same text share a timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    label: String,
    storage_key: String,
}

impl SessionKey {
    pub fn from_label(label: &str) -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX, label)
    }

    pub fn with_prefix(prefix: &str, label: &str) -> Self {
        let label = sanitize(label);
        Self {
            storage_key: format!("{prefix}{label}"),
            label,
        }
    }

    /// The sanitized label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key)
    }
}

fn sanitize(label: &str) -> String {
    let words: Vec<String> = label
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        words.join("_")
    }
}
