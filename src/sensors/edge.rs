//! Edge detection across successive slot scans.
//!
//! | last frame | new frame        | result          |
//! |------------|------------------|-----------------|
//! | empty      | non-empty        | `Rising(slot)`  |
//! | non-empty  | empty            | `Falling`       |
//! | anything else                 | `None`          |
//!
//! When several slots light up in the same scan only the lowest index is
//! reported; the rack only ever sees one puck at a time in practice.

use super::SensorFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    /// A slot became occupied.  Carries the lowest occupied slot.
    Rising(u8),
    /// All slots cleared.
    Falling,
}

/// Remembers the previous scan for the lifetime of the controller.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    last: SensorFrame,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self {
            last: SensorFrame::EMPTY,
        }
    }

    /// Compare `frame` against the previous scan, then remember it.
    pub fn detect(&mut self, frame: SensorFrame) -> Edge {
        let edge = match (self.last.is_empty(), frame.lowest_slot()) {
            (true, Some(slot)) => Edge::Rising(slot),
            (false, None) => Edge::Falling,
            _ => Edge::None,
        };
        self.last = frame;
        edge
    }

    /// The frame seen by the most recent [`detect`](Self::detect) call.
    pub fn last_frame(&self) -> SensorFrame {
        self.last
    }
}
