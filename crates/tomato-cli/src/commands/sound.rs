use clap::Subcommand;
use tomato_core::audio::{resolve_sound, SystemPlayer, SOUNDS};
use tomato_core::storage::{self, SqliteStore};
use tomato_core::{AppConfig, SoundCue};

use super::CmdResult;

#[derive(Subcommand)]
pub enum SoundAction {
    /// List built-in sounds and whether their files are installed
    List,
    /// Play a sound at the saved volume
    Test {
        /// Sound name; defaults to the selected sound
        name: Option<String>,
    },
}

pub fn run(action: SoundAction, config: &AppConfig) -> CmdResult {
    let dir = config.sounds_dir()?;

    match action {
        SoundAction::List => {
            println!("sounds directory: {}", dir.display());
            for (id, name) in SOUNDS {
                let status = match resolve_sound(&dir, id) {
                    Ok(_) => "installed",
                    Err(_) => "missing",
                };
                println!("{id:<8} {name:<14} {status}");
            }
        }
        SoundAction::Test { name } => {
            let store = SqliteStore::open()?;
            let settings = storage::load_settings(&store);
            let cue = SoundCue::new(
                name.unwrap_or(settings.selected_sound),
                settings.sound_volume,
            );
            if !config.audio.enabled {
                eprintln!("note: audio is disabled in config.toml");
            }
            SystemPlayer::new(dir).play_blocking(&cue)?;
            println!("played {} at volume {}", cue.sound, cue.volume);
        }
    }
    Ok(())
}
