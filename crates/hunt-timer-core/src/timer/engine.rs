//! Session timer engine.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or clocks - the caller feeds it `Tick` once per second while it
//! is running (see [`TimerDriver`](super::TimerDriver)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Seeded -> Running <-> Paused
//!                   Running -> Expired
//! (any) -> Editing -> Seeded | previous state
//! (any) -> Seeded (reset)
//! (any) -> Idle (close)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.transition(TimerCommand::Seed { seed_secs: 20_000 });
//! engine.transition(TimerCommand::Start);
//! // Once per second:
//! engine.transition(TimerCommand::Tick); // Some(Event::TimerExpired) at zero
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::format::DurationParts;
use crate::storage::TimerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Seeded,
    Running,
    Paused,
    Expired,
    Editing,
}

/// Hours/minutes/seconds being typed into the edit form.
///
/// Fields are not normalized: `0h 90m 0s` is a valid draft of 5400 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditDraft {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl EditDraft {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn from_seconds(total_secs: u64) -> Self {
        let parts = DurationParts::from_seconds(total_secs);
        Self::new(parts.hours, parts.minutes, parts.seconds)
    }

    pub fn total_secs(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Input to [`TimerEngine::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Open with a fresh duration.
    Seed { seed_secs: u64 },
    /// Open with a persisted record; `seed_secs` stays the reset target.
    Restore {
        seed_secs: u64,
        remaining_secs: u64,
        total_secs: u64,
    },
    Start,
    Pause,
    Tick,
    BeginEdit,
    SetDraft(EditDraft),
    ApplyEdit,
    CancelEdit,
    Reset,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditSession {
    draft: EditDraft,
    previous: TimerState,
}

/// Read-only projection of the timer for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub state: TimerState,
    pub running: bool,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub elapsed_secs: u64,
    /// 0.0 .. 1.0 of the total already elapsed.
    pub progress: f64,
    pub remaining: DurationParts,
    pub elapsed: DurationParts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<EditDraft>,
}

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimerEngine {
    state: TimerState,
    /// Duration the timer was opened with; `reset` returns here.
    seed_secs: u64,
    /// Baseline for elapsed time. Editing redefines it.
    total_secs: u64,
    remaining_secs: u64,
    edit: Option<EditSession>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn seed_secs(&self) -> u64 {
        self.seed_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }

    pub fn draft(&self) -> Option<EditDraft> {
        self.edit.map(|e| e.draft)
    }

    pub fn view(&self) -> TimerView {
        let elapsed_secs = self.elapsed_secs();
        let progress = if self.total_secs == 0 {
            0.0
        } else {
            elapsed_secs as f64 / self.total_secs as f64
        };
        TimerView {
            state: self.state,
            running: self.is_running(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            elapsed_secs,
            progress,
            remaining: DurationParts::from_seconds(self.remaining_secs),
            elapsed: DurationParts::from_seconds(elapsed_secs),
            draft: self.draft(),
        }
    }

    /// The persistable part of the timer.
    pub fn record(&self, updated_at: DateTime<Utc>) -> TimerRecord {
        TimerRecord {
            remaining_seconds: self.remaining_secs,
            total_seconds: self.total_secs,
            updated_at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn transition(&mut self, command: TimerCommand) -> Option<Event> {
        match command {
            TimerCommand::Seed { seed_secs } => self.seed(seed_secs),
            TimerCommand::Restore {
                seed_secs,
                remaining_secs,
                total_secs,
            } => self.restore(seed_secs, remaining_secs, total_secs),
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Tick => self.tick(),
            TimerCommand::BeginEdit => self.begin_edit(),
            TimerCommand::SetDraft(draft) => self.set_draft(draft),
            TimerCommand::ApplyEdit => self.apply_edit(),
            TimerCommand::CancelEdit => self.cancel_edit(),
            TimerCommand::Reset => self.reset(),
            TimerCommand::Close => self.close(),
        }
    }

    pub fn seed(&mut self, seed_secs: u64) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.seed_secs = seed_secs;
        self.total_secs = seed_secs;
        self.remaining_secs = seed_secs;
        self.state = TimerState::Seeded;
        Some(Event::TimerSeeded {
            total_secs: seed_secs,
            at: Utc::now(),
        })
    }

    pub fn restore(
        &mut self,
        seed_secs: u64,
        remaining_secs: u64,
        total_secs: u64,
    ) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.seed_secs = seed_secs;
        self.total_secs = total_secs;
        self.remaining_secs = remaining_secs.min(total_secs);
        self.state = TimerState::Seeded;
        Some(Event::TimerRestored {
            remaining_secs: self.remaining_secs,
            total_secs,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.remaining_secs == 0 {
            return None;
        }
        match self.state {
            TimerState::Seeded => {
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Advance one second. Returns `Some(Event::TimerExpired)` on reaching zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = TimerState::Expired;
        Some(Event::TimerExpired {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    pub fn begin_edit(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Editing => None,
            previous => {
                let draft = EditDraft::from_seconds(self.remaining_secs);
                self.edit = Some(EditSession { draft, previous });
                self.state = TimerState::Editing;
                Some(Event::EditStarted {
                    draft,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn set_draft(&mut self, draft: EditDraft) -> Option<Event> {
        let edit = self.edit.as_mut()?;
        edit.draft = draft;
        Some(Event::EditDraftChanged {
            draft,
            at: Utc::now(),
        })
    }

    /// Editing redefines the full duration: elapsed drops back to zero.
    pub fn apply_edit(&mut self) -> Option<Event> {
        let edit = self.edit.take()?;
        let total_secs = edit.draft.total_secs();
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.state = TimerState::Seeded;
        Some(Event::EditApplied {
            total_secs,
            at: Utc::now(),
        })
    }

    pub fn cancel_edit(&mut self) -> Option<Event> {
        let edit = self.edit.take()?;
        self.state = edit.previous;
        Some(Event::EditCancelled {
            resumed_state: edit.previous,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        if self.state == TimerState::Idle {
            return None;
        }
        self.edit = None;
        self.total_secs = self.seed_secs;
        self.remaining_secs = self.seed_secs;
        self.state = TimerState::Seeded;
        Some(Event::TimerReset {
            total_secs: self.seed_secs,
            at: Utc::now(),
        })
    }

    /// Close the view. Values are kept so the caller can persist them.
    pub fn close(&mut self) -> Option<Event> {
        if self.state == TimerState::Idle {
            return None;
        }
        self.edit = None;
        self.state = TimerState::Idle;
        Some(Event::TimerClosed {
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }
}
