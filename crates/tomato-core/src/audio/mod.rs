//! Notification cue playback.
//!
//! The engine only describes *which* cue to play; a [`CuePlayer`] turns the
//! description into sound. Every failure here is recoverable: callers log it
//! and carry on.

mod decode;
mod output;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

pub use decode::{decode_mono, Clip};
pub use output::play_blocking;

/// Built-in sounds shipped with the app, as `(id, display name)`.
pub const SOUNDS: [(&str, &str); 5] = [
    ("bell", "Bell"),
    ("bird", "Birdsong"),
    ("water", "Running Water"),
    ("wind", "Breeze"),
    ("forest", "Forest"),
];

pub const SOUND_EXTENSION: &str = "mp3";

/// A request to play `sound` at `volume` percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCue {
    pub sound: String,
    /// 0..=100
    pub volume: u8,
}

impl SoundCue {
    pub fn new(sound: impl Into<String>, volume: u8) -> Self {
        Self {
            sound: sound.into(),
            volume: volume.min(100),
        }
    }

    /// Volume as a 0.0..=1.0 gain.
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0
    }
}

impl Default for SoundCue {
    fn default() -> Self {
        Self::new("bell", 50)
    }
}

pub trait CuePlayer {
    fn play(&mut self, cue: &SoundCue) -> Result<(), AudioError>;
}

/// Resolve `<dir>/<name>.mp3`, rejecting names that could escape `dir`.
pub fn resolve_sound(dir: &Path, name: &str) -> Result<PathBuf, AudioError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AudioError::InvalidName(name.to_string()));
    }
    let path = dir.join(format!("{name}.{SOUND_EXTENSION}"));
    if !path.is_file() {
        return Err(AudioError::NotFound(path));
    }
    Ok(path)
}

pub fn is_builtin_sound(name: &str) -> bool {
    SOUNDS.iter().any(|(id, _)| *id == name)
}

/// Decodes sound files in-process and plays them on the default output
/// device at the cue's volume.
#[derive(Debug, Clone)]
pub struct SystemPlayer {
    sounds_dir: PathBuf,
}

impl SystemPlayer {
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
        }
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// Resolve and decode the cue's sound with its gain applied. `None` for
    /// a muted cue.
    pub fn load(&self, cue: &SoundCue) -> Result<Option<Clip>, AudioError> {
        let path = resolve_sound(&self.sounds_dir, &cue.sound)?;
        if cue.volume == 0 {
            tracing::debug!(sound = %cue.sound, "cue muted");
            return Ok(None);
        }
        let mut clip = decode_mono(&path)?;
        clip.apply_gain(cue.gain());
        tracing::debug!(path = %path.display(), gain = cue.gain(), "cue loaded");
        Ok(Some(clip))
    }

    /// Play a cue and wait for it to finish.
    pub fn play_blocking(&self, cue: &SoundCue) -> Result<(), AudioError> {
        match self.load(cue)? {
            Some(clip) => play_blocking(clip),
            None => Ok(()),
        }
    }
}

impl CuePlayer for SystemPlayer {
    /// Decoding errors are returned. Output runs on its own thread and logs
    /// its own errors.
    fn play(&mut self, cue: &SoundCue) -> Result<(), AudioError> {
        let Some(clip) = self.load(cue)? else {
            return Ok(());
        };
        let sound = cue.sound.clone();
        std::thread::Builder::new()
            .name("tomato-cue".into())
            .spawn(move || {
                if let Err(e) = play_blocking(clip) {
                    tracing::warn!(error = %e, %sound, "cue playback failed");
                }
            })
            .map_err(|e| AudioError::Output(format!("failed to spawn playback thread: {e}")))?;
        Ok(())
    }
}

/// Player used when audio is disabled in the app config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, _cue: &SoundCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Records every cue it is asked to play. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    played: Arc<Mutex<Vec<SoundCue>>>,
    fail: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player that records the cue and then reports it as missing.
    pub fn failing() -> Self {
        Self {
            played: Arc::default(),
            fail: true,
        }
    }

    pub fn played(&self) -> Vec<SoundCue> {
        self.played
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CuePlayer for RecordingPlayer {
    fn play(&mut self, cue: &SoundCue) -> Result<(), AudioError> {
        self.played
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(cue.clone());
        if self.fail {
            return Err(AudioError::NotFound(PathBuf::from(format!(
                "{}.{SOUND_EXTENSION}",
                cue.sound
            ))));
        }
        Ok(())
    }
}
