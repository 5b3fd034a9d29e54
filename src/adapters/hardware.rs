//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the scanner, the solenoid latch, the pump outputs and the button
//! pin, exposing them through [`SensorPort`] and [`ActuatorPort`].  This is
//! the only module that touches hardware.  Every driver is generic over
//! embedded-hal traits, so the same adapter runs against ESP-IDF drivers on
//! the device and against mocks on the host.
//!
//! Actuator writes are fire-and-forget: a failed write is logged here and
//! never reaches the domain.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use log::warn;

use crate::app::ports::{ActuatorPort, PumpLines, SensorPort};
use crate::drivers::latch::OutputLatch;
use crate::drivers::pump::PumpOutputs;
use crate::drivers::scanner::SensorScanner;
use crate::error::{Error, Result};
use crate::sensors::SensorFrame;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<SCAN, LATCH, PUMP, BUTTON> {
    scanner: SCAN,
    latch: LATCH,
    pump: PUMP,
    button: BUTTON,
}

impl<SCAN, LATCH, PUMP, BUTTON> HardwareAdapter<SCAN, LATCH, PUMP, BUTTON> {
    pub fn new(scanner: SCAN, latch: LATCH, pump: PUMP, button: BUTTON) -> Self {
        Self {
            scanner,
            latch,
            pump,
            button,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<SPI, LOAD, D, LATCH, PUMP, BUTTON> SensorPort
    for HardwareAdapter<SensorScanner<SPI, LOAD, D>, LATCH, PUMP, BUTTON>
where
    SPI: SpiBus,
    LOAD: OutputPin,
    D: DelayNs,
    BUTTON: InputPin,
{
    fn scan(&mut self) -> Result<SensorFrame> {
        self.scanner.scan()
    }

    fn button_level(&mut self) -> Result<bool> {
        self.button.is_high().map_err(|_| Error::Pin)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<SCAN, SPI, RCLK, DRIVE, RELEASE, BUTTON> ActuatorPort
    for HardwareAdapter<SCAN, OutputLatch<SPI, RCLK>, PumpOutputs<DRIVE, RELEASE>, BUTTON>
where
    SPI: SpiBus,
    RCLK: OutputPin,
    DRIVE: OutputPin,
    RELEASE: OutputPin,
{
    fn set_pump_lines(&mut self, lines: PumpLines) {
        if let Err(e) = self.pump.set(lines) {
            warn!("Pump write {:?} failed: {}", lines, e);
        }
    }

    fn write_solenoids(&mut self, mask: u8) {
        if let Err(e) = self.latch.write(mask) {
            warn!("Solenoid latch write 0b{:08b} failed: {}", mask, e);
        }
    }
}
