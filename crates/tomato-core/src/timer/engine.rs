//! Phase engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no timer of its own:
//! the caller delivers one `tick()` per elapsed second while the engine is
//! running (see [`Session`](super::Session) for the wiring).
//!
//! ## State Transitions
//!
//! ```text
//! Work -> ShortBreak -> Work -> ... -> Work -> LongBreak -> Work
//! ```
//!
//! Every boundary pauses the engine; the next phase waits for `start()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseEngine::new(PhaseConfig::default(), SoundCue::default());
//! engine.start();
//! // Once per second:
//! let effects = engine.tick(); // Non-empty when a phase completes
//! ```

use chrono::Utc;
use serde::Serialize;

use super::effect::{Accrual, Effect, PhaseCompletion};
use super::phase::{Phase, PhaseConfig};
use crate::audio::SoundCue;
use crate::events::Event;

/// Core phase engine.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseEngine {
    config: PhaseConfig,
    cue: SoundCue,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    completed_work_count: u32,
    task_id: Option<String>,
}

impl PhaseEngine {
    /// Create an engine paused at the start of a work phase.
    pub fn new(config: PhaseConfig, cue: SoundCue) -> Self {
        Self {
            config,
            cue,
            phase: Phase::Work,
            remaining_secs: config.work_secs(),
            running: false,
            completed_work_count: 0,
            task_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    pub fn cue(&self) -> &SoundCue {
        &self.cue
    }

    pub fn total_secs(&self) -> u64 {
        self.config.duration_secs(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            running: self.running,
            completed_work_count: self.completed_work_count,
            progress_pct: (self.progress() * 100.0).clamp(0.0, 100.0),
            task_id: self.task_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `None` when already running or nothing is left to count.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Work;
        self.remaining_secs = self.config.work_secs();
        self.running = false;
        self.completed_work_count = 0;
        self.task_id = None;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Apply newly saved settings. Starts over like `reset()`.
    pub fn reconfigure(&mut self, config: PhaseConfig, cue: SoundCue) -> Option<Event> {
        self.config = config;
        self.cue = cue;
        self.reset()
    }

    /// Task that receives the minutes of each completed work phase.
    pub fn associate_task(&mut self, task_id: Option<String>) {
        self.task_id = task_id;
    }

    /// Count down one second. Returns the effects of a phase boundary, or
    /// an empty list mid-phase and while paused.
    pub fn tick(&mut self) -> Vec<Effect> {
        if !self.running || self.remaining_secs == 0 {
            return Vec::new();
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return Vec::new();
        }

        let completed = self.phase;
        let next = self.advance();
        tracing::debug!(%completed, %next, count = self.completed_work_count, "phase boundary");

        let mut effects = vec![
            Effect::PlayCue(self.cue.clone()),
            Effect::PhaseCompleted(PhaseCompletion {
                completed,
                next,
                completed_work_count: self.completed_work_count,
            }),
        ];
        if completed == Phase::Work {
            if let Some(task_id) = &self.task_id {
                effects.push(Effect::AccrueDuration(Accrual {
                    task_id: task_id.clone(),
                    minutes: self.config.work_secs() as f64 / 60.0,
                }));
            }
        }
        effects
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) -> Phase {
        let next = match self.phase {
            Phase::Work => {
                self.completed_work_count = self.completed_work_count.saturating_add(1);
                if self.completed_work_count % self.config.cycle_count() == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_secs = self.config.duration_secs(next);
        self.running = false;
        next
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new(PhaseConfig::default(), SoundCue::default())
    }
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_engine(cycles: u32) -> PhaseEngine {
        PhaseEngine::new(PhaseConfig::from_secs(5, 5, 10, cycles), SoundCue::default())
    }

    fn run_phase(engine: &mut PhaseEngine) -> Vec<Effect> {
        engine.start();
        let mut last = Vec::new();
        while engine.is_running() {
            last = engine.tick();
        }
        last
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = PhaseEngine::default();
        assert!(!engine.is_running());

        assert!(engine.start().is_some());
        assert!(engine.is_running());
        assert!(engine.start().is_none());

        assert!(engine.pause().is_some());
        assert!(!engine.is_running());
        assert!(engine.pause().is_none());

        assert!(engine.start().is_some());
        assert!(engine.is_running());
    }

    #[test]
    fn tick_while_paused_is_ignored() {
        let mut engine = short_engine(4);
        assert!(engine.tick().is_empty());
        assert_eq!(engine.remaining_secs(), 5);
    }

    #[test]
    fn work_completion_moves_to_short_break_and_pauses() {
        let mut engine = short_engine(4);
        let effects = run_phase(&mut engine);

        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5);
        assert_eq!(engine.completed_work_count(), 1);
        assert!(!engine.is_running());
        assert_eq!(
            effects,
            vec![
                Effect::PlayCue(SoundCue::default()),
                Effect::PhaseCompleted(PhaseCompletion {
                    completed: Phase::Work,
                    next: Phase::ShortBreak,
                    completed_work_count: 1,
                }),
            ]
        );
    }

    #[test]
    fn long_break_after_cycle_count_work_phases() {
        let mut engine = short_engine(2);
        run_phase(&mut engine);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        run_phase(&mut engine);
        assert_eq!(engine.phase(), Phase::Work);
        run_phase(&mut engine);
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert_eq!(engine.remaining_secs(), 10);
        run_phase(&mut engine);
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.completed_work_count(), 2);
    }

    #[test]
    fn cycle_count_one_always_takes_long_breaks() {
        let mut engine = short_engine(1);
        for _ in 0..3 {
            run_phase(&mut engine);
            assert_eq!(engine.phase(), Phase::LongBreak);
            run_phase(&mut engine);
        }
    }

    #[test]
    fn accrual_only_for_work_with_task() {
        let mut engine = PhaseEngine::new(PhaseConfig::from_secs(90, 5, 5, 4), SoundCue::default());
        engine.associate_task(Some("t1".into()));

        let effects = run_phase(&mut engine);
        assert!(effects.contains(&Effect::AccrueDuration(Accrual {
            task_id: "t1".into(),
            minutes: 1.5,
        })));

        let effects = run_phase(&mut engine);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::AccrueDuration(_))));
    }

    #[test]
    fn reset_goes_to_beginning_and_clears_task() {
        let mut engine = short_engine(2);
        engine.associate_task(Some("t1".into()));
        run_phase(&mut engine);
        engine.start();
        engine.tick();

        engine.reset();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.remaining_secs(), 5);
        assert!(!engine.is_running());
        assert_eq!(engine.completed_work_count(), 0);
        assert_eq!(engine.task_id(), None);
    }

    #[test]
    fn reconfigure_applies_new_durations() {
        let mut engine = PhaseEngine::default();
        engine.start();
        engine.tick();
        engine.reconfigure(PhaseConfig::from_secs(0, 60, 60, 4), SoundCue::new("bird", 10));
        assert_eq!(engine.remaining_secs(), 5);
        assert_eq!(engine.cue().sound, "bird");
        assert!(!engine.is_running());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = PhaseEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                total_secs,
                running,
                progress_pct,
                ..
            } => {
                assert_eq!(phase, Phase::Work);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(total_secs, 25 * 60);
                assert!(!running);
                assert_eq!(progress_pct, 0.0);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut engine = PhaseEngine::new(PhaseConfig::from_secs(10, 5, 5, 4), SoundCue::default());
        engine.start();
        for _ in 0..4 {
            engine.tick();
        }
        assert!((engine.progress() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(120 * 60), "120:00");
    }
}
