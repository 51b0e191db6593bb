mod driver;
mod engine;
mod session;

pub use driver::{TimerDriver, TimerHandle, TICK_PERIOD};
pub use engine::{EditDraft, TimerCommand, TimerEngine, TimerState, TimerView};
pub use session::{TimerObserver, TimerSession};
