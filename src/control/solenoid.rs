//! Solenoid bank test sweep.
//!
//! Energises each channel alone for `solenoid_hold_ms`, lowest first, then
//! writes an all-clear.  For N channels that is N + 1 latch writes:
//!
//! ```text
//!  t = 0        hold       2·hold            N·hold
//!  0b0000_0001  0b0000_0010 0b0000_0100 … 0b0000_0000
//! ```
//!
//! Writes are fire-and-forget; a failed latch write is logged by the
//! hardware adapter and the sweep carries on.

use log::info;

use crate::app::ports::ActuatorPort;
use crate::config::{ControllerConfig, MAX_SOLENOID_CHANNELS};

/// Progress reported by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// `channel` is now the only energised solenoid.
    Energized(u8),
    /// All solenoids released; sweep over.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    channel: u8,
    since_ms: u64,
}

pub struct SolenoidBank {
    channels: u8,
    hold_ms: u64,
    sweep: Option<Sweep>,
}

impl SolenoidBank {
    /// Channel counts beyond the latch width are clamped to it.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            channels: config.solenoid_channels.min(MAX_SOLENOID_CHANNELS),
            hold_ms: u64::from(config.solenoid_hold_ms),
            sweep: None,
        }
    }

    /// Start a sweep by energising channel 0.  Returns `None` if a sweep is
    /// already running; that sweep is left as it is.
    pub fn run_test_sweep(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> Option<SweepStep> {
        if self.sweep.is_some() {
            return None;
        }
        info!("Solenoid sweep: {} channels, {} ms each", self.channels, self.hold_ms);
        Some(self.energize(0, now_ms, hw))
    }

    /// Advance the sweep.  Call once per tick.
    pub fn poll(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> Option<SweepStep> {
        let sweep = self.sweep?;
        if now_ms.saturating_sub(sweep.since_ms) < self.hold_ms {
            return None;
        }
        let next = sweep.channel + 1;
        if next < self.channels {
            Some(self.energize(next, now_ms, hw))
        } else {
            hw.write_solenoids(0);
            self.sweep = None;
            Some(SweepStep::Cleared)
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Channel currently energised by a sweep.
    pub fn active_channel(&self) -> Option<u8> {
        self.sweep.map(|s| s.channel)
    }

    fn energize(&mut self, channel: u8, now_ms: u64, hw: &mut impl ActuatorPort) -> SweepStep {
        hw.write_solenoids(1u8.checked_shl(u32::from(channel)).unwrap_or(0));
        self.sweep = Some(Sweep {
            channel,
            since_ms: now_ms,
        });
        SweepStep::Energized(channel)
    }
}
