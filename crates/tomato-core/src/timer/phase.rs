use serde::{Deserialize, Serialize};

/// Shortest countdown any phase may have, in seconds.
pub const MIN_PHASE_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase durations and cycle length for one run of the engine.
///
/// The fields are private so every instance has passed through the
/// clamping constructors: each duration is at least [`MIN_PHASE_SECS`] and
/// the cycle count is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseConfig {
    work_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
    cycle_count: u32,
}

impl PhaseConfig {
    /// Build from durations in seconds, clamping out-of-range values.
    pub fn from_secs(work: u64, short_break: u64, long_break: u64, cycle_count: u32) -> Self {
        Self {
            work_secs: work.max(MIN_PHASE_SECS),
            short_break_secs: short_break.max(MIN_PHASE_SECS),
            long_break_secs: long_break.max(MIN_PHASE_SECS),
            cycle_count: cycle_count.max(1),
        }
    }

    /// Build from (possibly fractional) minutes as stored in settings.
    ///
    /// Negative, zero and non-finite values all end up at the floor.
    pub fn from_minutes(work: f64, short_break: f64, long_break: f64, cycle_count: u32) -> Self {
        Self::from_secs(
            minutes_to_secs(work),
            minutes_to_secs(short_break),
            minutes_to_secs(long_break),
            cycle_count,
        )
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn short_break_secs(&self) -> u64 {
        self.short_break_secs
    }

    pub fn long_break_secs(&self) -> u64 {
        self.long_break_secs
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self::from_secs(25 * 60, 5 * 60, 15 * 60, 4)
    }
}

fn minutes_to_secs(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    // `as` saturates for values beyond u64::MAX.
    (minutes * 60.0).round() as u64
}
