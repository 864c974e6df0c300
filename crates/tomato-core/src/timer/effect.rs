use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::audio::SoundCue;

/// What happened at a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    pub completed: Phase,
    pub next: Phase,
    pub completed_work_count: u32,
}

/// Work minutes to add to a task's recorded duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accrual {
    pub task_id: String,
    pub minutes: f64,
}

/// A side effect requested by a phase transition.
///
/// The engine only returns these; dispatching them is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    PlayCue(SoundCue),
    PhaseCompleted(PhaseCompletion),
    AccrueDuration(Accrual),
}
