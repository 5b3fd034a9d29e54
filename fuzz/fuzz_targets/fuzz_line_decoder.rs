//! Fuzz target: `LineDecoder::push` feeding `AppService::handle_line`
//!
//! Drives arbitrary byte sequences through the host-link line decoder and
//! dispatches whatever comes out.  Asserts that the decoder never panics,
//! never yields an untrimmed, empty or over-long line, and that dispatch
//! only ever touches the actuators for an exact command token.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use puckdrop::app::commands::Command;
use puckdrop::app::events::AppEvent;
use puckdrop::app::ports::{ActuatorPort, EventSink, PumpLines};
use puckdrop::app::service::AppService;
use puckdrop::config::ControllerConfig;
use puckdrop::link::{LineDecoder, MAX_LINE_LEN};

struct Outputs {
    writes: usize,
}

impl ActuatorPort for Outputs {
    fn set_pump_lines(&mut self, _lines: PumpLines) {
        self.writes += 1;
    }

    fn write_solenoids(&mut self, _mask: u8) {
        self.writes += 1;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();
    let mut app = AppService::new(ControllerConfig::default()).expect("default config is valid");
    let mut hw = Outputs { writes: 0 };
    let mut sink = Discard;

    for (i, &byte) in data.iter().enumerate() {
        if let Some(line) = decoder.push(byte) {
            assert!(!line.is_empty(), "decoder yielded a blank line");
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
            assert_eq!(line, line.trim_ascii(), "line not trimmed");

            let before = hw.writes;
            let is_command = Command::from_token(line).is_some();
            app.handle_line(line, i as u64, &mut hw, &mut sink);
            if !is_command {
                assert_eq!(hw.writes, before, "non-command touched actuators");
            }
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    for &byte in data {
        let _ = decoder.push(byte);
    }
});
