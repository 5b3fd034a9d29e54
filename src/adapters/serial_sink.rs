//! Host-link event sink adapter.
//!
//! Implements [`EventSink`] by writing one CRLF-terminated ASCII line per
//! [`AppEvent`] to the host serial link.  The game engine on the host acts
//! on `DROP <slot>` and `START`; every other line carries the `LOG ` prefix
//! so the host can ignore it.
//!
//! Each line is formatted into a fixed buffer first and handed to the
//! writer in one call, so a failed write never leaves half a line on the
//! wire.

use core::fmt::{self, Write};

use heapless::String;
use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::pump::PumpState;

/// Longest line this sink produces, terminator included.
const LINE_CAPACITY: usize = 48;

/// Adapter that turns every [`AppEvent`] into a host line.
pub struct SerialEventSink<W> {
    out: W,
}

impl<W: Write> SerialEventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        let mut buf: String<LINE_CAPACITY> = String::new();
        if buf.write_fmt(args).and_then(|_| buf.write_str("\r\n")).is_err() {
            warn!("Host line overflowed {LINE_CAPACITY} B; dropped");
            return;
        }
        if self.out.write_str(&buf).is_err() {
            warn!("Host link write failed: {}", buf.trim_end());
        }
    }
}

impl<W: Write> EventSink for SerialEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => self.line(format_args!("LOG ready")),
            AppEvent::Drop(drop) => self.line(format_args!("DROP {}", drop.slot)),
            AppEvent::SlotsCleared => self.line(format_args!("LOG slots clear")),
            AppEvent::StartPressed => self.line(format_args!("START")),
            AppEvent::PumpChanged { to, .. } => {
                let word = match to {
                    PumpState::Running => "on",
                    PumpState::Releasing => "release",
                    PumpState::Idle => "off",
                };
                self.line(format_args!("LOG pump {word}"));
            }
            AppEvent::SafetyStop(fault) => {
                self.line(format_args!("LOG pump safety stop: {fault}"))
            }
            AppEvent::ExerciseStarted => self.line(format_args!("LOG exercise start")),
            AppEvent::ExerciseFinished => self.line(format_args!("LOG exercise done")),
            AppEvent::ExerciseAborted => self.line(format_args!("LOG exercise aborted")),
            AppEvent::SolenoidEnergized { channel } => {
                self.line(format_args!("LOG solenoid {channel}"))
            }
            AppEvent::SolenoidsCleared => self.line(format_args!("LOG solenoids clear")),
        }
    }
}
