//! Unified error types for the puckdrop firmware.
//!
//! A single `Copy` error enum that every driver result maps into, keeping
//! the control loop's handling uniform.  Hardware I/O is treated as
//! fire-and-forget: there are no retries, and the only automatic reaction
//! to a fault is the pump watchdog driving the actuators to a known-off
//! state.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An SPI transfer to one of the shift-register chains failed.
    Bus,
    /// A GPIO read or write failed.
    Pin,
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI bus transfer failed"),
            Self::Pin => write!(f, "GPIO access failed"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Safety faults
// ---------------------------------------------------------------------------

/// Conditions that make the pump watchdog cut both actuators.
///
/// Accumulated as a bitmask by [`PumpWatchdog`](crate::safety::PumpWatchdog)
/// so a diagnostic read-out can show every trip since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// Pump drive line stayed on for the full run timeout.
    RunTimeout = 0b0000_0001,
    /// Release line stayed on for the configured release timeout.
    ReleaseTimeout = 0b0000_0010,
}

impl SafetyFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunTimeout => write!(f, "run timeout"),
            Self::ReleaseTimeout => write!(f, "release timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
