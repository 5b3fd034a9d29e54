//! Drop-triggered pump exercise: drive, then release, then stop.
//!
//! ```text
//!  start()          drive_ms elapsed      release_ms elapsed
//!  ──────▶ Driving ───────────────▶ Releasing ───────────────▶ Inactive
//!          (1,0)                     (0,1)                      (0,0)
//! ```
//!
//! Each phase records when it began and `poll` advances it once the
//! phase's own hold time has elapsed.  If the pump is found in a state the
//! current phase did not put it in (an operator command, a watchdog trip),
//! the exercise gives up and leaves the pump alone.

use crate::app::ports::ActuatorPort;
use crate::config::ControllerConfig;

use super::pump::{PumpController, PumpState};

/// Progress reported by [`PumpExercise::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStep {
    /// Drive phase over; release line now on.
    Releasing,
    /// Release phase over; pump stopped.
    Finished,
    /// The pump left the expected state; exercise abandoned.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Inactive,
    Driving { since_ms: u64 },
    Releasing { since_ms: u64 },
}

pub struct PumpExercise {
    stage: Stage,
    drive_ms: u64,
    release_ms: u64,
}

impl PumpExercise {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            stage: Stage::Inactive,
            drive_ms: u64::from(config.exercise_drive_ms),
            release_ms: u64::from(config.exercise_release_ms),
        }
    }

    /// Begin the sequence by activating the pump.  Returns `false` and does
    /// nothing if an exercise is already in progress.
    pub fn start(
        &mut self,
        now_ms: u64,
        pump: &mut PumpController,
        hw: &mut impl ActuatorPort,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        pump.activate(now_ms, hw);
        self.stage = Stage::Driving { since_ms: now_ms };
        true
    }

    /// Advance the sequence.  Call once per tick.
    pub fn poll(
        &mut self,
        now_ms: u64,
        pump: &mut PumpController,
        hw: &mut impl ActuatorPort,
    ) -> Option<ExerciseStep> {
        match self.stage {
            Stage::Inactive => None,

            Stage::Driving { since_ms } => {
                if pump.state() != PumpState::Running {
                    return Some(self.abort());
                }
                if now_ms.saturating_sub(since_ms) < self.drive_ms {
                    return None;
                }
                pump.release(now_ms, hw);
                self.stage = Stage::Releasing { since_ms: now_ms };
                Some(ExerciseStep::Releasing)
            }

            Stage::Releasing { since_ms } => {
                if pump.state() != PumpState::Releasing {
                    return Some(self.abort());
                }
                if now_ms.saturating_sub(since_ms) < self.release_ms {
                    return None;
                }
                pump.stop(hw);
                self.stage = Stage::Inactive;
                Some(ExerciseStep::Finished)
            }
        }
    }

    /// Forget the sequence without touching the pump.  Returns whether one
    /// was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.stage = Stage::Inactive;
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.stage != Stage::Inactive
    }

    fn abort(&mut self) -> ExerciseStep {
        self.stage = Stage::Inactive;
        ExerciseStep::Aborted
    }
}
