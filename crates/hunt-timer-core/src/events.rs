use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{EditDraft, TimerState};

/// Every timer state change produces an Event.
/// Observers subscribe to them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A fresh duration was loaded from the estimator.
    TimerSeeded {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A persisted record was loaded instead of the seed.
    TimerRestored {
        remaining_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time reached zero. Emitted once per expiry.
    TimerExpired {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    EditStarted {
        draft: EditDraft,
        at: DateTime<Utc>,
    },
    EditDraftChanged {
        draft: EditDraft,
        at: DateTime<Utc>,
    },
    EditApplied {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    EditCancelled {
        resumed_state: TimerState,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerClosed {
        remaining_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerSeeded { at, .. }
            | Event::TimerRestored { at, .. }
            | Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerExpired { at, .. }
            | Event::EditStarted { at, .. }
            | Event::EditDraftChanged { at, .. }
            | Event::EditApplied { at, .. }
            | Event::EditCancelled { at, .. }
            | Event::TimerReset { at, .. }
            | Event::TimerClosed { at, .. } => *at,
        }
    }
}
