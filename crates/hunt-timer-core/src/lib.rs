//! # hunt-timer core library
//!
//! Estimates how long a hunting session has to run before a rare item
//! drops, and keeps a persistent countdown for that session. The CLI is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Estimator**: pure functions over a drop probability and a kill rate
//!   (geometric-distribution mean and quantiles)
//! - **Timer Engine**: a tick-driven state machine with edit/reset/expiry
//! - **Timer Session**: binds an engine to a session key and a store,
//!   persisting after every change and notifying observers
//! - **Timer Driver**: the async one-second tick loop
//! - **Storage**: SQLite key-value timer records and TOML configuration
//!
//! ## Key Components
//!
//! - [`estimate()`]: expected kills and time-to-drop
//! - [`TimerEngine`]: core timer state machine
//! - [`TimerSession`]: persistent timer for one session key
//! - [`TimerDriver`]: tokio tick loop
//! - [`Config`]: application configuration management

pub mod error;
pub mod estimate;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, InsufficientData, Result, StorageError};
pub use estimate::{
    estimate, estimate_with, plan, DerivationStrategy, EstimationResult, EstimatorConfig,
    ExperienceSample, HuntPlan, KillRate, KillRateSource, Milestone, RateObservation,
    SamplingWindow,
};
pub use events::Event;
pub use format::{format_duration, format_percent, parse_percent, DurationParts};
pub use storage::{Config, MemoryStore, SessionKey, SqliteStore, TimerRecord, TimerStore};
pub use timer::{
    EditDraft, TimerCommand, TimerDriver, TimerEngine, TimerHandle, TimerObserver, TimerSession,
    TimerState, TimerView,
};
