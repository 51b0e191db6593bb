use std::io::Write;

use clap::{Args, Subcommand, ValueEnum};
use hunt_timer_core::{
    format_duration, Config, EditDraft, Event, InsufficientData, SessionKey, SqliteStore,
    TimerCommand, TimerDriver, TimerHandle, TimerSession, TimerState, TimerView,
};

use super::estimate::RateArgs;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Open the timer, print its state and close it again
    Show {
        #[command(flatten)]
        target: TargetArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start the countdown in the foreground until it expires or Ctrl-C
    Run {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Replace the timer's duration
    Edit {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long, default_value = "0")]
        hours: u64,
        #[arg(long, default_value = "0")]
        minutes: u64,
        #[arg(long = "secs", default_value = "0")]
        secs: u64,
    },
    /// Go back to the seed duration
    Reset {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Delete the saved timer for a label
    Clear {
        /// Item or goal label
        #[arg(long)]
        label: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Milestone {
    /// Mean kill count (about 63.2%)
    #[default]
    Expected,
    /// 90% chance of at least one drop
    Ninety,
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Item or goal label
    #[arg(long)]
    pub label: Option<String>,
    /// Seed duration in seconds
    #[arg(long, conflicts_with = "drop_rate")]
    pub seconds: Option<u64>,
    /// Which estimate seeds the timer when --drop-rate is given
    #[arg(long, value_enum, default_value_t = Milestone::Expected)]
    pub milestone: Milestone,
    #[command(flatten)]
    pub rate: RateArgs,
}

impl TargetArgs {
    /// Seed from `--seconds` or the estimate; `None` when neither was given.
    fn seed_secs(&self, config: &Config) -> Result<Option<u64>, InsufficientData> {
        if let Some(secs) = self.seconds {
            return Ok(Some(secs));
        }
        if !self.rate.has_drop_rate() {
            return Ok(None);
        }
        let hunt = self.rate.plan(config)?;
        Ok(Some(match self.milestone {
            Milestone::Expected => hunt.estimate.seconds_to_expected,
            Milestone::Ninety => hunt.estimate.seconds_to_90_percent,
        }))
    }

    fn require_seed(&self, config: &Config) -> Result<u64, Box<dyn std::error::Error>> {
        self.seed_secs(config)?
            .ok_or_else(|| "--seconds or --drop-rate is required to seed the timer".into())
    }
}

fn log_event(key: &SessionKey, event: &Event) {
    tracing::info!(key = %key, event = ?event, "timer event");
}

fn new_session(
    target: &TargetArgs,
    config: &Config,
) -> Result<TimerSession<SqliteStore>, Box<dyn std::error::Error>> {
    let key = config.session_key(target.label.as_deref());
    Ok(TimerSession::new(key, SqliteStore::open()?).with_observer(log_event))
}

fn print_view(key: &SessionKey, view: &TimerView, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let body = serde_json::json!({ "key": key.storage_key(), "label": key.label(), "timer": view });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "타이머 – {} [{:?}] 남은 시간 {} / 전체 {} (경과 {})",
            key.label(),
            view.state,
            view.remaining.label,
            format_duration(view.total_secs),
            view.elapsed.label
        );
    }
    Ok(())
}

fn print_missing(key: &SessionKey, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let body = serde_json::json!({ "key": key.storage_key(), "label": key.label(), "timer": null });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "저장된 타이머가 없습니다 – {}. --seconds 또는 --drop-rate로 시작하세요.",
            key.label()
        );
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        TimerAction::Show { target, json } => {
            let seed = target.seed_secs(&config)?;
            let mut session = new_session(&target, &config)?;
            match seed {
                Some(seed) => {
                    session.open(seed);
                    print_view(session.key(), &session.view(), json)?;
                    session.close();
                }
                // read-only: the saved record is left untouched
                None if session.resume().is_some() => {
                    print_view(session.key(), &session.view(), json)?;
                }
                None => print_missing(session.key(), json)?,
            }
        }
        TimerAction::Edit {
            target,
            hours,
            minutes,
            secs,
        } => {
            let draft = EditDraft::new(hours, minutes, secs);
            let seed = target.seed_secs(&config)?;
            let mut session = new_session(&target, &config)?;
            match seed {
                Some(seed) => {
                    session.open(seed);
                }
                None => {
                    if session.resume().is_none() {
                        session.open(draft.total_secs());
                    }
                }
            }
            session.dispatch(TimerCommand::BeginEdit);
            session.dispatch(TimerCommand::SetDraft(draft));
            session.dispatch(TimerCommand::ApplyEdit);
            print_view(session.key(), &session.view(), false)?;
            session.close();
        }
        TimerAction::Reset { target } => {
            let seed = target.require_seed(&config)?;
            let mut session = new_session(&target, &config)?;
            session.open(seed);
            session.reset();
            print_view(session.key(), &session.view(), false)?;
            session.close();
        }
        TimerAction::Clear { label } => {
            let key = config.session_key(label.as_deref());
            let mut session = TimerSession::new(key, SqliteStore::open()?);
            session.forget();
            println!("cleared {}", session.key());
        }
        TimerAction::Run { target } => {
            let seed = target.require_seed(&config)?;
            let mut session = new_session(&target, &config)?;
            session.open(seed);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_foreground(session, config.timer.bell_on_expiry))?;
        }
    }
    Ok(())
}

/// Wait until a queued pause or expiry has been published.
async fn settled_view(handle: &mut TimerHandle) -> TimerView {
    let mut view = handle.view();
    while view.state == TimerState::Running {
        match handle.changed().await {
            Some(next) => view = next,
            None => break,
        }
    }
    view
}

async fn run_foreground(
    mut session: TimerSession<SqliteStore>,
    bell: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = session.key().clone();
    if session.view().remaining_secs == 0 {
        println!("남은 시간이 없습니다. `timer reset` 또는 `timer edit`으로 다시 설정하세요.");
        session.close();
        return Ok(());
    }
    if bell {
        session.subscribe(|_: &SessionKey, event: &Event| {
            if let Event::TimerExpired { .. } = event {
                eprint!("\x07");
            }
        });
    }

    let (mut handle, task) = TimerDriver::spawn(session);
    handle.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            view = handle.changed() => {
                let Some(view) = view else { break };
                write!(stdout, "\r타이머 – {}  {}  ", key.label(), view.remaining.label)?;
                stdout.flush()?;
                if view.state == TimerState::Expired {
                    writeln!(stdout, "\n시간이 다 되었습니다!")?;
                    break;
                }
            }
            _ = &mut ctrl_c => {
                handle.pause();
                writeln!(stdout)?;
                break;
            }
        }
    }

    let last = settled_view(&mut handle).await;
    handle.close();
    task.await?;
    print_view(&key, &last, false)?;
    Ok(())
}
