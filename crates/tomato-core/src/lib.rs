//! # Tomato Todo Core Library
//!
//! Business logic for the Tomato Todo Pomodoro timer and task tracker. The
//! `tomato` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Phase Engine**: a pure, tick-driven state machine cycling through
//!   work, short-break and long-break phases; phase boundaries return effect
//!   descriptions instead of performing side effects
//! - **Session**: wires the engine to an injectable tick source and an audio
//!   cue player, and dispatches the effects
//! - **Storage**: a key-value port with SQLite and in-memory backends for
//!   the settings record and the task list, plus TOML app configuration
//! - **Tasks & Stats**: the task list and the date bucketing behind charts
//!
//! ## Key Components
//!
//! - [`PhaseEngine`]: Core timer state machine
//! - [`Session`]: Engine plus tick source and effect dispatch
//! - [`KeyValueStore`]: Storage port
//! - [`TimerSettings`]: Persisted user preferences

pub mod audio;
pub mod error;
pub mod events;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use audio::{CuePlayer, SoundCue};
pub use error::{AudioError, ConfigError, StorageError, ValidationError};
pub use events::Event;
pub use settings::TimerSettings;
pub use stats::{Bucket, StatsRange, TaskShare};
pub use storage::{AppConfig, KeyValueStore, MemoryStore, SqliteStore};
pub use task::{Task, TaskList};
pub use timer::{Effect, Phase, PhaseConfig, PhaseEngine, Session};
