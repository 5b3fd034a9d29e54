//! Pump output pair driver (drive + release, two active-high GPIOs).
//!
//! ## Safety contract
//!
//! The two lines are never high at the same time.  On every change the
//! line being switched off is written first, and a request for both lines
//! is refused and treated as off.  Timing policy lives in
//! [`crate::control::pump`]; this driver is a dumb actuator.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::PumpLines;
use crate::error::{Error, Result};

pub struct PumpOutputs<DRIVE, RELEASE> {
    drive: DRIVE,
    release: RELEASE,
}

impl<DRIVE, RELEASE> PumpOutputs<DRIVE, RELEASE>
where
    DRIVE: OutputPin,
    RELEASE: OutputPin,
{
    /// Take both pins and drive them low.
    pub fn new(drive: DRIVE, release: RELEASE) -> Result<Self> {
        let mut outputs = Self {
            drive,
            release,
        };
        outputs.drive.set_low().map_err(|_| Error::Pin)?;
        outputs.release.set_low().map_err(|_| Error::Pin)?;
        Ok(outputs)
    }

    pub fn set(&mut self, lines: PumpLines) -> Result<()> {
        let lines = if lines.drive && lines.release {
            warn!("Pump: drive and release requested together; forcing both off");
            PumpLines::OFF
        } else {
            lines
        };

        // Break before make.
        if !lines.drive {
            self.drive.set_low().map_err(|_| Error::Pin)?;
        }
        if !lines.release {
            self.release.set_low().map_err(|_| Error::Pin)?;
        }
        if lines.drive {
            self.drive.set_high().map_err(|_| Error::Pin)?;
        }
        if lines.release {
            self.release.set_high().map_err(|_| Error::Pin)?;
        }
        Ok(())
    }
}
