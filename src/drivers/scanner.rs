//! Slot sensor scanner (74HC165 parallel-in / serial-out chain).
//!
//! ## Protocol
//!
//! ```text
//!  SH/LD  ‾‾‾‾\______/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!              ≥5µs    ≥5µs
//!  SCK    ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾ ⎍⎍⎍⎍⎍⎍⎍⎍ ‾‾‾‾‾‾
//!  MISO                      D7 … D0
//! ```
//!
//! Pulling SH/LD low copies the parallel sensor lines into the register;
//! returning it high freezes them for shifting.  One byte transfer then
//! clocks the snapshot out.  The sensors are active-low, so the raw byte
//! is normalised by [`SensorFrame::from_raw`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::error::{Error, Result};
use crate::sensors::SensorFrame;

pub struct SensorScanner<SPI, LOAD, D> {
    spi: SPI,
    load: LOAD,
    delay: D,
    pulse_us: u32,
}

impl<SPI, LOAD, D> SensorScanner<SPI, LOAD, D>
where
    SPI: SpiBus,
    LOAD: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the bus and load line.  Leaves the load line idle
    /// (high) so the register is ready to shift.
    pub fn new(spi: SPI, mut load: LOAD, delay: D, pulse_us: u32) -> Result<Self> {
        load.set_high().map_err(|_| Error::Pin)?;
        Ok(Self {
            spi,
            load,
            delay,
            pulse_us,
        })
    }

    /// Latch and read one frame.
    pub fn scan(&mut self) -> Result<SensorFrame> {
        self.load.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(self.pulse_us);
        self.load.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(self.pulse_us);

        let mut word = [0u8];
        self.spi
            .transfer_in_place(&mut word)
            .map_err(|_| Error::Bus)?;
        Ok(SensorFrame::from_raw(word[0]))
    }
}
