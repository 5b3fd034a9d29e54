//! Controller configuration parameters
//!
//! All tunable timing and sizing values for the puck-drop controller.
//! Defaults match the shipped mechanism.  A device build may override
//! them at compile time with a JSON document (see `main.rs`); nothing is
//! persisted across resets.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on solenoid channels: one output shift register.
pub const MAX_SOLENOID_CHANNELS: u8 = 8;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Pump ---
    /// Maximum time the drive line may stay on before the watchdog stops it (ms)
    pub pump_run_timeout_ms: u32,
    /// Optional limit on how long the release line may stay on (ms).
    /// `None` leaves the release line unguarded.
    pub pump_release_timeout_ms: Option<u32>,
    /// Drive phase of the drop-triggered pump exercise (ms)
    pub exercise_drive_ms: u32,
    /// Release phase of the drop-triggered pump exercise (ms)
    pub exercise_release_ms: u32,

    // --- Solenoids ---
    /// Number of solenoid channels swept by RESET
    pub solenoid_channels: u8,
    /// Hold time per channel during a sweep (ms)
    pub solenoid_hold_ms: u32,

    // --- Inputs ---
    /// Minimum press duration for the start button to count (ms)
    pub button_debounce_ms: u32,
    /// Hold time for each phase of the sensor load pulse (µs)
    pub load_pulse_us: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Task watchdog timeout for the control loop (milliseconds)
    pub device_watchdog_timeout_ms: u32,

    // --- Host link ---
    /// UART baud rate for the host command channel
    pub host_baud: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Pump
            pump_run_timeout_ms: 30_000,
            pump_release_timeout_ms: None,
            exercise_drive_ms: 2_000,
            exercise_release_ms: 2_000,

            // Solenoids
            solenoid_channels: 7,
            solenoid_hold_ms: 2_000,

            // Inputs
            button_debounce_ms: 1,
            load_pulse_us: 5,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
            device_watchdog_timeout_ms: 10_000,

            // Host link
            host_baud: 115_200,
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON document and validate it.  Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would disable a safety mechanism or address
    /// hardware that does not exist.
    pub fn validate(&self) -> Result<()> {
        if self.pump_run_timeout_ms == 0 {
            return Err(Error::Config("pump_run_timeout_ms must be non-zero"));
        }
        if self.pump_release_timeout_ms == Some(0) {
            return Err(Error::Config("pump_release_timeout_ms must be non-zero"));
        }
        if self.solenoid_channels == 0 || self.solenoid_channels > MAX_SOLENOID_CHANNELS {
            return Err(Error::Config("solenoid_channels must be 1..=8"));
        }
        if self.control_loop_interval_ms == 0
            || self.control_loop_interval_ms >= self.pump_run_timeout_ms
        {
            return Err(Error::Config(
                "control_loop_interval_ms must be non-zero and below the run timeout",
            ));
        }
        if self.control_loop_interval_ms >= self.device_watchdog_timeout_ms {
            return Err(Error::Config(
                "control_loop_interval_ms must be below the device watchdog timeout",
            ));
        }
        if self.host_baud == 0 {
            return Err(Error::Config("host_baud must be non-zero"));
        }
        Ok(())
    }
}
