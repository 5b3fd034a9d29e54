//! Slot sensor data model and edge detection.
//!
//! The rack has one light-barrier sensor per slot, read in parallel through
//! a shift register (see [`crate::drivers::scanner`]).  A puck falling
//! through slot *i* interrupts its barrier, which pulls line *i* LOW.
//! [`SensorFrame`] normalises that into an active-high mask.

pub mod edge;

pub use edge::{Edge, EdgeDetector};

/// Bits of the input register wired to slot sensors.  Bit 7 is unused.
pub const SLOT_MASK: u8 = 0b0111_1111;

/// Number of physical slots.
pub const SLOT_COUNT: u8 = SLOT_MASK.count_ones() as u8;

/// One scan of the slot sensors, active-high, bit 7 always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorFrame(u8);

impl SensorFrame {
    /// No slot occupied.
    pub const EMPTY: Self = Self(0);

    /// Normalise a raw, active-low register byte.
    pub const fn from_raw(raw: u8) -> Self {
        Self(!raw & SLOT_MASK)
    }

    /// Build a frame from an already active-high mask.  Bit 7 is dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & SLOT_MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Index of the lowest occupied slot, or `None` for an empty frame.
    pub const fn lowest_slot(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            // Only reached with a non-zero mask.
            Some(self.0.trailing_zeros() as u8)
        }
    }
}

/// A puck detected in a slot.  Derived per tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub slot: u8,
    /// Monotonic time of the scan that saw it (ms).
    pub at_ms: u64,
}
