//! Application core: pure domain logic, zero I/O.
//!
//! Slot edge handling, the pump and its watchdog, the drop-triggered pump
//! exercise, the solenoid sweep and host command dispatch.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
