//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (shift registers, GPIO, the host serial link) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! Reads are fallible so a bad scan is never mistaken for an empty rack.
//! Writes are fire-and-forget: the adapter logs a failed write and moves on.

use crate::error::Result;
use crate::sensors::SensorFrame;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples inputs through this once per tick.
pub trait SensorPort {
    /// Latch and read the slot sensors.
    fn scan(&mut self) -> Result<SensorFrame>;

    /// Current level of the start button (`true` = pressed).
    fn button_level(&mut self) -> Result<bool>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Levels for the pump's drive / release output pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpLines {
    pub drive: bool,
    pub release: bool,
}

impl PumpLines {
    pub const OFF: Self = Self {
        drive: false,
        release: false,
    };
    pub const DRIVE: Self = Self {
        drive: true,
        release: false,
    };
    pub const RELEASE: Self = Self {
        drive: false,
        release: true,
    };
}

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the pump output pair.
    fn set_pump_lines(&mut self, lines: PumpLines);

    /// Shift `mask` into the solenoid register and latch it (bit n = channel n).
    fn write_solenoids(&mut self, mask: u8);

    /// Pump off and every solenoid de-energised.
    fn all_off(&mut self) {
        self.set_pump_lines(PumpLines::OFF);
        self.write_solenoids(0);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → host link / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  Adapters decide where they go (host UART, test recorder, …).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
