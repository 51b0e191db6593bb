//! Async tick loop for a [`TimerSession`].
//!
//! The driver task owns the session. It waits on the command channel and,
//! only while the engine is running, on a one-second interval. The interval
//! is created on every entry into `Running` and dropped on every exit, so a
//! session never has two tick sources and a pause stops ticking before the
//! next command is read.
//!
//! Dropping every [`TimerHandle`] or sending `Close` ends the task; the
//! session is closed (and persisted) before it is handed back.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};

use super::engine::{TimerCommand, TimerView};
use super::session::TimerSession;
use crate::storage::TimerStore;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cloneable control side of a running driver.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<TimerCommand>,
    view: watch::Receiver<TimerView>,
}

impl TimerHandle {
    /// Queue a command. Returns `false` once the driver has stopped.
    pub fn send(&self, command: TimerCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(TimerCommand::Start)
    }

    pub fn pause(&self) -> bool {
        self.send(TimerCommand::Pause)
    }

    pub fn reset(&self) -> bool {
        self.send(TimerCommand::Reset)
    }

    pub fn close(&self) -> bool {
        self.send(TimerCommand::Close)
    }

    /// Latest published view.
    pub fn view(&self) -> TimerView {
        self.view.borrow().clone()
    }

    /// Wait for the next published view. `None` once the driver is gone.
    pub async fn changed(&mut self) -> Option<TimerView> {
        self.view.changed().await.ok()?;
        Some(self.view.borrow_and_update().clone())
    }
}

pub struct TimerDriver<S> {
    session: TimerSession<S>,
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    views: watch::Sender<TimerView>,
    ticker: Option<Interval>,
}

impl<S> TimerDriver<S>
where
    S: TimerStore + Send + 'static,
{
    pub fn new(session: TimerSession<S>) -> (Self, TimerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(session.view());
        let driver = Self {
            session,
            commands: command_rx,
            views: view_tx,
            ticker: None,
        };
        let handle = TimerHandle {
            commands: command_tx,
            view: view_rx,
        };
        (driver, handle)
    }

    /// Spawn the driver on the current tokio runtime.
    pub fn spawn(session: TimerSession<S>) -> (TimerHandle, JoinHandle<TimerSession<S>>) {
        let (driver, handle) = Self::new(session);
        (handle, tokio::spawn(driver.run()))
    }

    pub async fn run(mut self) -> TimerSession<S> {
        loop {
            self.sync_ticker();
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(TimerCommand::Close) | None => break,
                    Some(command) => {
                        self.session.dispatch(command);
                    }
                },
                _ = next_tick(&mut self.ticker) => {
                    self.session.tick();
                }
            }
            self.publish();
        }

        self.ticker = None;
        self.session.close();
        self.publish();
        self.session
    }

    fn sync_ticker(&mut self) {
        let running = self.session.engine().is_running();
        match (running, self.ticker.is_some()) {
            (true, false) => {
                let mut ticker = time::interval_at(time::Instant::now() + TICK_PERIOD, TICK_PERIOD);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn publish(&self) {
        let view = self.session.view();
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
