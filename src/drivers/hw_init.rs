//! One-shot board bring-up.
//!
//! Claims the GPIOs listed in [`crate::pins`], opens one SPI host per
//! shift-register chain and the host UART, then wraps everything in the
//! generic drivers.  Called once from `main()` before the control loop
//! starts.

use core::fmt;

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    delay::Ets,
    gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, Output, PinDriver},
    peripherals::Peripherals,
    spi::{SpiBusDriver, SpiDriver, SpiDriverConfig, config::Config as SpiConfig},
    uart::{UartDriver, config::Config as UartConfig},
    units::Hertz,
};
#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::adapters::hardware::HardwareAdapter;
#[cfg(target_os = "espidf")]
use crate::config::ControllerConfig;
#[cfg(target_os = "espidf")]
use crate::drivers::{latch::OutputLatch, pump::PumpOutputs, scanner::SensorScanner};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    PeripheralsTaken,
    GpioConfigFailed(i32),
    SpiInitFailed(i32),
    UartInitFailed(i32),
    /// A driver rejected its initial pin levels.
    DriverInitFailed,
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeripheralsTaken => write!(f, "peripherals already taken"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::SpiInitFailed(rc) => write!(f, "SPI init failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::DriverInitFailed => write!(f, "driver rejected initial pin levels"),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── Board types ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type BoardSpi = SpiBusDriver<'static, SpiDriver<'static>>;
#[cfg(target_os = "espidf")]
pub type BoardOutput = PinDriver<'static, AnyOutputPin, Output>;
#[cfg(target_os = "espidf")]
pub type BoardInput = PinDriver<'static, AnyInputPin, Input>;

#[cfg(target_os = "espidf")]
pub type BoardHardware = HardwareAdapter<
    SensorScanner<BoardSpi, BoardOutput, Ets>,
    OutputLatch<BoardSpi, BoardOutput>,
    PumpOutputs<BoardOutput, BoardOutput>,
    BoardInput,
>;

#[cfg(target_os = "espidf")]
pub struct Board {
    pub hardware: BoardHardware,
    pub host_uart: UartDriver<'static>,
}

// ── Bring-up ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_board(config: &ControllerConfig) -> Result<Board, HwInitError> {
    let p = Peripherals::take().map_err(|_| HwInitError::PeripheralsTaken)?;

    // SAFETY: called once from main(); every GPIO number below comes from
    // `pins` and is claimed exactly once.
    let (load, rclk, drive, release, button) = unsafe {
        (
            AnyOutputPin::new(pins::SENSOR_LOAD_GPIO),
            AnyOutputPin::new(pins::SOLENOID_LATCH_GPIO),
            AnyOutputPin::new(pins::PUMP_DRIVE_GPIO),
            AnyOutputPin::new(pins::PUMP_RELEASE_GPIO),
            AnyInputPin::new(pins::BUTTON_GPIO),
        )
    };
    let output = |pin| PinDriver::output(pin).map_err(|e| HwInitError::GpioConfigFailed(e.code()));

    let spi_cfg = SpiConfig::new().baudrate(Hertz(pins::SHIFT_REGISTER_SPI_HZ));
    let spi_err = |e: esp_idf_hal::sys::EspError| HwInitError::SpiInitFailed(e.code());

    // SAFETY: as above.
    let sensor_bus = unsafe {
        SpiDriver::new(
            p.spi2,
            AnyOutputPin::new(pins::SENSOR_SCLK_GPIO),
            AnyOutputPin::new(pins::SENSOR_MOSI_GPIO),
            Some(AnyInputPin::new(pins::SENSOR_MISO_GPIO)),
            &SpiDriverConfig::new(),
        )
    }
    .map_err(spi_err)?;
    let sensor_spi = SpiBusDriver::new(sensor_bus, &spi_cfg).map_err(spi_err)?;

    // SAFETY: as above.
    let solenoid_bus = unsafe {
        SpiDriver::new(
            p.spi3,
            AnyOutputPin::new(pins::SOLENOID_SCLK_GPIO),
            AnyOutputPin::new(pins::SOLENOID_MOSI_GPIO),
            Option::<AnyInputPin>::None,
            &SpiDriverConfig::new(),
        )
    }
    .map_err(spi_err)?;
    let solenoid_spi = SpiBusDriver::new(solenoid_bus, &spi_cfg).map_err(spi_err)?;

    let scanner = SensorScanner::new(sensor_spi, output(load)?, Ets, config.load_pulse_us)
        .map_err(|_| HwInitError::DriverInitFailed)?;
    let latch = OutputLatch::new(solenoid_spi, output(rclk)?)
        .map_err(|_| HwInitError::DriverInitFailed)?;
    let pump = PumpOutputs::new(output(drive)?, output(release)?)
        .map_err(|_| HwInitError::DriverInitFailed)?;
    let button =
        PinDriver::input(button).map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;

    // SAFETY: as above.
    let host_uart = unsafe {
        UartDriver::new(
            p.uart1,
            AnyOutputPin::new(pins::HOST_UART_TX_GPIO),
            AnyInputPin::new(pins::HOST_UART_RX_GPIO),
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::new().baudrate(Hertz(config.host_baud)),
        )
    }
    .map_err(|e| HwInitError::UartInitFailed(e.code()))?;

    info!(
        "hw_init: shift registers @ {} Hz, host link @ {} baud",
        pins::SHIFT_REGISTER_SPI_HZ,
        config.host_baud
    );

    Ok(Board {
        hardware: HardwareAdapter::new(scanner, latch, pump, button),
        host_uart,
    })
}
