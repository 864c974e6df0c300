//! Local persistence behind a key-value port.
//!
//! The engine never touches storage; the CLI loads settings and tasks
//! through these helpers and writes them back when they change. Reads never
//! fail: anything missing or malformed is replaced by defaults and logged.

mod config;
mod memory;
mod sqlite;

pub use config::{AppConfig, AudioConfig, LogConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;
use crate::settings::TimerSettings;
use crate::task::TaskList;

pub const TASKS_KEY: &str = "tomato-todo-tasks";
pub const SETTINGS_KEY: &str = "tomato-todo-settings";

/// String key-value storage port.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `TOMATO_TODO_HOME` overrides the location outright. Otherwise it is
/// `~/.config/tomato-todo[-dev]/`, with `-dev` selected by
/// `TOMATO_TODO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("TOMATO_TODO_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMATO_TODO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomato-todo-dev")
            } else {
                base_dir.join("tomato-todo")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load settings, falling back to defaults on any read or parse problem.
///
/// A stored object with some fields missing keeps the fields it has.
pub fn load_settings(store: &dyn KeyValueStore) -> TimerSettings {
    let raw = match store.get(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return TimerSettings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read settings, using defaults");
            return TimerSettings::default();
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "stored settings are not valid JSON, using defaults");
            return TimerSettings::default();
        }
    };
    if !value.is_object() {
        tracing::warn!("stored settings are not an object, using defaults");
        return TimerSettings::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "stored settings are malformed, using defaults");
        TimerSettings::default()
    })
}

pub fn save_settings(
    store: &mut dyn KeyValueStore,
    settings: &TimerSettings,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(settings).map_err(|source| StorageError::Encode {
        key: SETTINGS_KEY.to_string(),
        source,
    })?;
    store.set(SETTINGS_KEY, &json)
}

/// Load the task list; an unreadable list is treated as empty.
pub fn load_tasks(store: &dyn KeyValueStore) -> TaskList {
    match store.get(TASKS_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<Option<TaskList>>(&raw)
            .map(Option::unwrap_or_default)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored tasks are malformed, starting empty");
                TaskList::default()
            }),
        Ok(None) => TaskList::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read tasks, starting empty");
            TaskList::default()
        }
    }
}

pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &TaskList) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks).map_err(|source| StorageError::Encode {
        key: TASKS_KEY.to_string(),
        source,
    })?;
    store.set(TASKS_KEY, &json)
}
