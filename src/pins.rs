//! GPIO / peripheral pin assignments for the puckdrop controller board.
//!
//! Single source of truth: `drivers::hw_init` references this module
//! rather than hard-coding pin numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Sensor input chain (74HC165, parallel-in / serial-out) on SPI2
// ---------------------------------------------------------------------------

/// Digital output: SH/LD. Pulsed LOW to latch the parallel sensor lines.
pub const SENSOR_LOAD_GPIO: i32 = 3;
/// SPI2 clock to the input chain.
pub const SENSOR_SCLK_GPIO: i32 = 12;
/// SPI2 MISO from the input chain's serial output.
pub const SENSOR_MISO_GPIO: i32 = 13;
/// SPI2 MOSI, wired to the 165's DS cascade input.  Whatever is shifted in
/// here is overwritten by the next load pulse.
pub const SENSOR_MOSI_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Solenoid output chain (74HC595, serial-in / parallel-out) on SPI3
// ---------------------------------------------------------------------------

/// Digital output: RCLK. Rising edge copies the shifted byte to the outputs.
pub const SOLENOID_LATCH_GPIO: i32 = 4;
/// SPI3 clock to the output chain.
pub const SOLENOID_SCLK_GPIO: i32 = 14;
/// SPI3 MOSI into the output chain.
pub const SOLENOID_MOSI_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Pump actuator pair (active HIGH, never both on)
// ---------------------------------------------------------------------------

/// Digital output: pump drive.
pub const PUMP_DRIVE_GPIO: i32 = 8;
/// Digital output: pump release valve.
pub const PUMP_RELEASE_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// User button (active HIGH with external pull-down)
// ---------------------------------------------------------------------------

/// Momentary start button.
pub const BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Host link UART
// ---------------------------------------------------------------------------

pub const HOST_UART_TX_GPIO: i32 = 17;
pub const HOST_UART_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// SPI configuration
// ---------------------------------------------------------------------------

/// Clock for both shift-register chains.  The 74HC family is comfortable
/// well above this at 3.3 V.
pub const SHIFT_REGISTER_SPI_HZ: u32 = 1_000_000;
