//! A timer bound to a session key and a store.
//!
//! `TimerSession` restores or seeds the engine on open, persists after every
//! mutation and on close, and forwards every event to its observers.
//! Storage failures never escape: reads fall back to the seed, writes are
//! logged and the timer keeps going in memory.

use chrono::Utc;
use tracing::{debug, warn};

use super::engine::{TimerCommand, TimerEngine, TimerView};
use crate::events::Event;
use crate::storage::{SessionKey, TimerStore};

/// Receives every event a session produces.
pub trait TimerObserver {
    fn on_event(&mut self, key: &SessionKey, event: &Event);
}

impl<F> TimerObserver for F
where
    F: FnMut(&SessionKey, &Event),
{
    fn on_event(&mut self, key: &SessionKey, event: &Event) {
        self(key, event)
    }
}

pub struct TimerSession<S> {
    key: SessionKey,
    store: S,
    engine: TimerEngine,
    observers: Vec<Box<dyn TimerObserver + Send>>,
}

impl<S: TimerStore> TimerSession<S> {
    pub fn new(key: SessionKey, store: S) -> Self {
        Self {
            key,
            store,
            engine: TimerEngine::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl TimerObserver + Send + 'static) -> Self {
        self.subscribe(observer);
        self
    }

    pub fn subscribe(&mut self, observer: impl TimerObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn view(&self) -> TimerView {
        self.engine.view()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open the view: restore the persisted record for this key, or seed
    /// with `seed_secs` if there is none or it cannot be read.
    pub fn open(&mut self, seed_secs: u64) -> Option<Event> {
        let command = match self.store.load(&self.key) {
            Ok(Some(record)) if record.is_consistent() => TimerCommand::Restore {
                seed_secs,
                remaining_secs: record.remaining_seconds,
                total_secs: record.total_seconds,
            },
            Ok(Some(record)) => {
                warn!(key = %self.key, ?record, "ignoring inconsistent timer record");
                TimerCommand::Seed { seed_secs }
            }
            Ok(None) => TimerCommand::Seed { seed_secs },
            Err(e) => {
                warn!(key = %self.key, error = %e, "timer store unreadable, using seed");
                TimerCommand::Seed { seed_secs }
            }
        };
        self.dispatch(command)
    }

    /// Restore the persisted record without seeding and without writing.
    ///
    /// Returns `None` and leaves the engine Idle when there is no usable
    /// record. The restored total is the reset target.
    pub fn resume(&mut self) -> Option<Event> {
        let record = match self.store.load(&self.key) {
            Ok(Some(record)) if record.is_consistent() => record,
            Ok(Some(record)) => {
                warn!(key = %self.key, ?record, "ignoring inconsistent timer record");
                return None;
            }
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "timer store unreadable");
                return None;
            }
        };
        let event = self.engine.transition(TimerCommand::Restore {
            seed_secs: record.total_seconds,
            remaining_secs: record.remaining_seconds,
            total_secs: record.total_seconds,
        })?;
        self.notify(&event);
        Some(event)
    }

    /// Apply a command, persist if anything changed, notify observers.
    pub fn dispatch(&mut self, command: TimerCommand) -> Option<Event> {
        let before = (self.engine.remaining_secs(), self.engine.total_secs());
        let event = self.engine.transition(command);
        let after = (self.engine.remaining_secs(), self.engine.total_secs());

        if event.is_some() || before != after {
            self.persist();
        }
        if let Some(ref event) = event {
            self.notify(event);
        }
        event
    }

    fn notify(&mut self, event: &Event) {
        debug!(key = %self.key, ?event, "timer transition");
        for observer in &mut self.observers {
            observer.on_event(&self.key, event);
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        self.dispatch(TimerCommand::Start)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.dispatch(TimerCommand::Pause)
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.dispatch(TimerCommand::Tick)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.dispatch(TimerCommand::Reset)
    }

    pub fn close(&mut self) -> Option<Event> {
        self.dispatch(TimerCommand::Close)
    }

    /// Delete the persisted record for this key. The in-memory timer is
    /// left as is.
    pub fn forget(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to remove timer record");
        }
    }

    fn persist(&self) {
        let record = self.engine.record(Utc::now());
        if let Err(e) = self.store.save(&self.key, &record) {
            warn!(key = %self.key, error = %e, "timer store write failed, continuing in memory");
        }
    }
}
