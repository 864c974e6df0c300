mod effect;
mod engine;
mod phase;
mod session;
mod tick;

pub use effect::{Accrual, Effect, PhaseCompletion};
pub use engine::{format_clock, PhaseEngine};
pub use phase::{Phase, PhaseConfig, MIN_PHASE_SECS};
pub use session::Session;
pub use tick::{IntervalTicker, ManualTicker, Tick, TickSender, TickSource, TICK_PERIOD};
