//! Solenoid output latch (74HC595 serial-in / parallel-out chain).
//!
//! RCLK is held low while the byte is shifted in and raised once the bus
//! has drained; the rising edge copies the byte to the outputs in one step,
//! so the solenoids never see a partially shifted pattern.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::error::{Error, Result};

pub struct OutputLatch<SPI, LATCH> {
    spi: SPI,
    latch: LATCH,
}

impl<SPI, LATCH> OutputLatch<SPI, LATCH>
where
    SPI: SpiBus,
    LATCH: OutputPin,
{
    pub fn new(spi: SPI, mut latch: LATCH) -> Result<Self> {
        latch.set_high().map_err(|_| Error::Pin)?;
        Ok(Self { spi, latch })
    }

    /// Shift `byte` out and latch it.
    pub fn write(&mut self, byte: u8) -> Result<()> {
        self.latch.set_low().map_err(|_| Error::Pin)?;
        let shifted = self.spi.write(&[byte]).and_then(|()| self.spi.flush());
        // Raise the latch even after a bus error so the line is never left
        // parked low.
        self.latch.set_high().map_err(|_| Error::Pin)?;
        shifted.map_err(|_| Error::Bus)
    }
}
