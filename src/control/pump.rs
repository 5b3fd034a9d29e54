//! Pump state machine.
//!
//! ```text
//!            activate()              release()
//!   ┌──────┐ ─────────▶ ┌─────────┐ ─────────▶ ┌───────────┐
//!   │ Idle │            │ Running │            │ Releasing │
//!   └──────┘ ◀───────── └─────────┘ ◀───────── └───────────┘
//!       ▲      stop() /      activate()              │
//!       │      watchdog                              │
//!       └───────────────── stop() ───────────────────┘
//! ```
//!
//! Every operation is legal from every state.  Output lines are written
//! before the state is updated.  Actuator writes cannot fail at the port,
//! so the recorded state matches the pins only while the hardware accepts
//! them; a rejected pin write is logged by the adapter and the state moves
//! on regardless.
//!
//! ## Safety contract
//!
//! [`PumpController::watchdog`] must be called every tick.  A running
//! session that reaches the run timeout is stopped there.  A repeated
//! `activate()` restarts the session clock; this extends the window and
//! is logged.

use log::warn;

use crate::app::ports::{ActuatorPort, PumpLines};
use crate::config::ControllerConfig;
use crate::error::SafetyFault;
use crate::safety::PumpWatchdog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Running,
    Releasing,
}

/// Bookkeeping for one drive period.  Only exists while Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSession {
    pub started_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running(PumpSession),
    Releasing { since_ms: u64 },
}

pub struct PumpController {
    phase: Phase,
    watchdog: PumpWatchdog,
}

impl PumpController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            phase: Phase::Idle,
            watchdog: PumpWatchdog::new(config),
        }
    }

    /// Energise the drive line and start a new session.
    pub fn activate(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        if let Phase::Running(session) = self.phase {
            warn!(
                "Pump activated while running; run timer restarted {} ms into session",
                now_ms.saturating_sub(session.started_ms)
            );
        }
        hw.set_pump_lines(PumpLines::DRIVE);
        self.phase = Phase::Running(PumpSession { started_ms: now_ms });
    }

    /// Switch from drive to the release line.
    pub fn release(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        hw.set_pump_lines(PumpLines::RELEASE);
        self.phase = Phase::Releasing { since_ms: now_ms };
    }

    /// Both lines off.  Idempotent.
    pub fn stop(&mut self, hw: &mut impl ActuatorPort) {
        hw.set_pump_lines(PumpLines::OFF);
        self.phase = Phase::Idle;
    }

    /// Enforce the timeouts.  Returns the fault if the pump was stopped.
    pub fn watchdog(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> Option<SafetyFault> {
        let fault = match self.phase {
            Phase::Idle => None,
            Phase::Running(session) => self.watchdog.check_running(session.started_ms, now_ms),
            Phase::Releasing { since_ms } => self.watchdog.check_releasing(since_ms, now_ms),
        }?;
        self.stop(hw);
        Some(fault)
    }

    pub fn state(&self) -> PumpState {
        match self.phase {
            Phase::Idle => PumpState::Idle,
            Phase::Running(_) => PumpState::Running,
            Phase::Releasing { .. } => PumpState::Releasing,
        }
    }

    /// The current drive session, if Running.
    pub fn session(&self) -> Option<PumpSession> {
        match self.phase {
            Phase::Running(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Latched watchdog faults since boot.
    pub fn safety(&self) -> &PumpWatchdog {
        &self.watchdog
    }
}
