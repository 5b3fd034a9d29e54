//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The serial adapter turns
//! drops and button presses into host notifications and everything else
//! into `LOG` lines.

use crate::control::pump::PumpState;
use crate::error::SafetyFault;
use crate::sensors::DropEvent;

/// Events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started; all actuators are off.
    Started,

    /// A puck entered a slot.
    Drop(DropEvent),

    /// Every slot sensor is clear again.
    SlotsCleared,

    /// The start button was pressed and released.
    StartPressed,

    /// The pump moved between states.
    PumpChanged { from: PumpState, to: PumpState },

    /// The pump watchdog forced a stop.
    SafetyStop(SafetyFault),

    /// The drop-triggered pump exercise began.
    ExerciseStarted,

    /// The pump exercise ran to completion.
    ExerciseFinished,

    /// The pump exercise was abandoned before completion.
    ExerciseAborted,

    /// A solenoid sweep energised `channel`.
    SolenoidEnergized { channel: u8 },

    /// A solenoid sweep finished and released every channel.
    SolenoidsCleared,
}
