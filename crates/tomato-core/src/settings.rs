//! Persisted timer settings.
//!
//! Durations are stored in minutes and may be fractional (5/60 is five
//! seconds). Durations are kept as the user saved them; clamping happens at
//! the point of use in [`TimerSettings::phase_config`] and
//! [`TimerSettings::sanitized`]. The integer fields are rounded and clamped
//! as they are read, so one bad number never discards the whole record.

use serde::{Deserialize, Deserializer, Serialize};

use crate::audio::SoundCue;
use crate::error::ConfigError;
use crate::timer::PhaseConfig;

pub const MIN_WORK_MINUTES: f64 = 5.0 / 60.0;
pub const MAX_WORK_MINUTES: f64 = 120.0;
pub const SHORT_BREAK_RANGE: (f64, f64) = (1.0, 30.0);
pub const LONG_BREAK_RANGE: (f64, f64) = (5.0, 60.0);
pub const CYCLE_RANGE: (u32, u32) = (1, 99);

/// The flat settings record shared with storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(default = "default_work_duration")]
    pub work_duration: f64,
    #[serde(default = "default_short_break")]
    pub short_break_duration: f64,
    #[serde(default = "default_long_break")]
    pub long_break_duration: f64,
    #[serde(default = "default_cycle_count", deserialize_with = "lenient_cycle_count")]
    pub cycle_count: u32,
    #[serde(default = "default_volume", deserialize_with = "lenient_volume")]
    pub sound_volume: u8,
    #[serde(default = "default_sound")]
    pub selected_sound: String,
}

fn default_work_duration() -> f64 {
    25.0
}
fn default_short_break() -> f64 {
    5.0
}
fn default_long_break() -> f64 {
    15.0
}
fn default_cycle_count() -> u32 {
    4
}
fn default_volume() -> u8 {
    50
}
fn default_sound() -> String {
    "bell".into()
}

/// Any JSON number, rounded. Anything else reads as absent.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()).map(f64::round))
}

fn lenient_cycle_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let (min, max) = CYCLE_RANGE;
    Ok(lenient_number(deserializer)?
        .map(|n| n.clamp(f64::from(min), f64::from(max)) as u32)
        .unwrap_or_else(default_cycle_count))
}

fn lenient_volume<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(lenient_number(deserializer)?
        .map(|n| n.clamp(0.0, 100.0) as u8)
        .unwrap_or_else(default_volume))
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            cycle_count: default_cycle_count(),
            sound_volume: default_volume(),
            selected_sound: default_sound(),
        }
    }
}

impl TimerSettings {
    /// Durations in seconds with the 5-second floor applied.
    pub fn phase_config(&self) -> PhaseConfig {
        PhaseConfig::from_minutes(
            self.work_duration,
            self.short_break_duration,
            self.long_break_duration,
            self.cycle_count,
        )
    }

    pub fn cue(&self) -> SoundCue {
        SoundCue::new(self.selected_sound.clone(), self.sound_volume)
    }

    /// Clamp every field into the range the settings editor offers.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            work_duration: clamp_minutes(
                self.work_duration,
                MIN_WORK_MINUTES,
                MAX_WORK_MINUTES,
                defaults.work_duration,
            ),
            short_break_duration: clamp_minutes(
                self.short_break_duration,
                SHORT_BREAK_RANGE.0,
                SHORT_BREAK_RANGE.1,
                defaults.short_break_duration,
            ),
            long_break_duration: clamp_minutes(
                self.long_break_duration,
                LONG_BREAK_RANGE.0,
                LONG_BREAK_RANGE.1,
                defaults.long_break_duration,
            ),
            cycle_count: self.cycle_count.clamp(CYCLE_RANGE.0, CYCLE_RANGE.1),
            sound_volume: self.sound_volume.min(100),
            selected_sound: if self.selected_sound.trim().is_empty() {
                defaults.selected_sound
            } else {
                self.selected_sound.trim().to_string()
            },
        }
    }

    /// Field names as they appear in the persisted record.
    pub fn keys() -> Vec<String> {
        match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Get a value as string by field name.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a field by name, parsing `value` against the field's type.
    ///
    /// Integer fields round fractional input and clamp it to their range.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` for names not in the record and `InvalidValue`
    /// when a number field is given something that is not a finite number.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(key, e.to_string()))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Number(_) => {
                let trimmed = value.trim();
                if let Ok(n) = trimmed.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = trimmed.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(key, format!("'{value}' is not a finite number")))?
                } else {
                    return Err(invalid(key, format!("cannot parse '{value}' as number")));
                }
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(key.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        Ok(())
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

fn clamp_minutes(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
