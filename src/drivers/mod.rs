//! Shift-register, pump and button drivers, plus board bring-up.

pub mod button;
pub mod hw_init;
pub mod latch;
pub mod pump;
pub mod scanner;
pub mod watchdog;
