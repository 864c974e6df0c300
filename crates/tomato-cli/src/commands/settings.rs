use clap::Subcommand;
use tomato_core::audio::is_builtin_sound;
use tomato_core::storage::{self, SqliteStore};
use tomato_core::TimerSettings;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Field name (e.g. "workDuration", "selectedSound")
        key: String,
    },
    /// Set a settings value; out-of-range values are clamped
    Set {
        /// Field name
        key: String,
        /// New value
        value: String,
    },
    /// Print all settings as JSON
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction) -> CmdResult {
    let mut store = SqliteStore::open()?;

    match action {
        SettingsAction::Get { key } => {
            let settings = storage::load_settings(&store);
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    let keys = TimerSettings::keys().join(", ");
                    return Err(format!("unknown key: {key} (expected one of {keys})").into());
                }
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = storage::load_settings(&store);
            settings.set(&key, &value)?;
            let clean = settings.sanitized();
            if clean != settings {
                eprintln!(
                    "note: {key} adjusted to {}",
                    clean.get(&key).unwrap_or_default()
                );
            }
            if !is_builtin_sound(&clean.selected_sound) {
                eprintln!(
                    "note: '{}' is not a built-in sound; it must exist in the sounds directory",
                    clean.selected_sound
                );
            }
            storage::save_settings(&mut store, &clean)?;
            println!("ok");
        }
        SettingsAction::List => {
            print_json(&storage::load_settings(&store))?;
        }
        SettingsAction::Reset => {
            storage::save_settings(&mut store, &TimerSettings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
