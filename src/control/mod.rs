//! Actuator control: the pump state machine and the two timed sequences
//! that drive it and the solenoid bank.
//!
//! Nothing here blocks.  Timed sequences remember when their current phase
//! began and are advanced by `poll(now_ms, …)` once per control tick, so the
//! watchdog and input scanning keep running underneath them.

pub mod exercise;
pub mod pump;
pub mod solenoid;
