mod config;
pub mod database;
mod record;
mod session_key;

pub use config::{Config, TimerConfig};
pub use database::SqliteStore;
pub use record::{MemoryStore, TimerRecord, TimerStore};
pub use session_key::{SessionKey, DEFAULT_KEY_PREFIX};

use std::path::PathBuf;

/// Returns the data directory for config and timer records.
///
/// `HUNT_TIMER_HOME` wins if set. Otherwise this is
/// `~/.config/hunt-timer[-dev]/`, with `HUNT_TIMER_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HUNT_TIMER_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HUNT_TIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("hunt-timer-dev")
            } else {
                base_dir.join("hunt-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
