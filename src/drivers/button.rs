//! Start button monitor.
//!
//! ## Hardware
//!
//! Active-high momentary switch, sampled once per control tick (no ISR).
//!
//! ## Press detection
//!
//! | Level edge | Action                                                  |
//! |------------|---------------------------------------------------------|
//! | rising     | remember when the press began                           |
//! | falling    | held ≥ debounce → [`ButtonEvent::Start`], else `Bounce` |
//!
//! The debounce window is configuration (`button_debounce_ms`).  The
//! shipped value is 1 ms, which accepts practically every press.

use log::debug;

/// Events emitted on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// A press long enough to count.
    Start,
    /// A release too soon after the press; ignored.
    Bounce { held_ms: u64 },
}

/// Level-tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Pressed { since_ms: u64 },
}

pub struct ButtonMonitor {
    state: ButtonState,
    debounce_ms: u64,
}

impl ButtonMonitor {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            state: ButtonState::Idle,
            debounce_ms: u64::from(debounce_ms),
        }
    }

    /// Call from the main loop at each control tick with the sampled level.
    /// Returns a classified event on release.
    pub fn tick(&mut self, now_ms: u64, pressed: bool) -> Option<ButtonEvent> {
        match (self.state, pressed) {
            (ButtonState::Idle, true) => {
                self.state = ButtonState::Pressed { since_ms: now_ms };
                None
            }

            (ButtonState::Pressed { since_ms }, false) => {
                self.state = ButtonState::Idle;
                let held_ms = now_ms.saturating_sub(since_ms);
                if held_ms >= self.debounce_ms {
                    Some(ButtonEvent::Start)
                } else {
                    debug!("Button: bounce ignored ({held_ms} ms)");
                    Some(ButtonEvent::Bounce { held_ms })
                }
            }

            // Level unchanged.
            _ => None,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }
}
