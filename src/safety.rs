//! Pump watchdog.
//!
//! The watchdog runs **every tick before anything else** in
//! [`AppService::tick`](crate::app::service::AppService::tick).  It is the
//! only automatic safety mechanism: it does not raise diagnostics on the
//! host link beyond a log line, it simply drives the pump to a known-off
//! state.
//!
//! ## Limits
//!
//! | Pump state | Limit                        | Fault                          |
//! |------------|------------------------------|--------------------------------|
//! | Running    | `pump_run_timeout_ms`        | [`SafetyFault::RunTimeout`]    |
//! | Releasing  | `pump_release_timeout_ms`, if configured | [`SafetyFault::ReleaseTimeout`] |
//! | Idle       | —                            | —                              |
//!
//! Trips are latched into a bitmask so a status read-out can show every
//! fault seen since boot.

use crate::config::ControllerConfig;
use crate::error::SafetyFault;
use log::error;

/// Timeout policy for the pump output pair.
#[derive(Debug, Clone)]
pub struct PumpWatchdog {
    run_timeout_ms: u64,
    release_timeout_ms: Option<u64>,
    /// Latched fault bitmask.
    faults: u8,
    trips: u32,
}

impl PumpWatchdog {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            run_timeout_ms: u64::from(config.pump_run_timeout_ms),
            release_timeout_ms: config.pump_release_timeout_ms.map(u64::from),
            faults: 0,
            trips: 0,
        }
    }

    /// Check a running phase that began at `started_ms`.
    pub fn check_running(&mut self, started_ms: u64, now_ms: u64) -> Option<SafetyFault> {
        let elapsed = now_ms.saturating_sub(started_ms);
        (elapsed >= self.run_timeout_ms).then(|| self.trip(SafetyFault::RunTimeout, elapsed))
    }

    /// Check a releasing phase that began at `since_ms`.
    pub fn check_releasing(&mut self, since_ms: u64, now_ms: u64) -> Option<SafetyFault> {
        let limit = self.release_timeout_ms?;
        let elapsed = now_ms.saturating_sub(since_ms);
        (elapsed >= limit).then(|| self.trip(SafetyFault::ReleaseTimeout, elapsed))
    }

    /// Faults seen since boot.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// Check if a specific fault has ever tripped.
    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }

    /// Total number of forced stops since boot.
    pub fn trips(&self) -> u32 {
        self.trips
    }

    fn trip(&mut self, fault: SafetyFault, elapsed_ms: u64) -> SafetyFault {
        error!("SAFETY STOP: {fault} after {elapsed_ms} ms");
        self.faults |= fault.mask();
        self.trips = self.trips.saturating_add(1);
        fault
    }
}
