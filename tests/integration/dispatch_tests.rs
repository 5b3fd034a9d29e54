//! Integration tests for host command dispatch: framed bytes in, actuator
//! calls out.

use crate::mock_hw::{ActuatorCall, Rig};

use puckdrop::app::events::AppEvent;
use puckdrop::app::ports::PumpLines;
use puckdrop::control::pump::PumpState;
use puckdrop::link::LineDecoder;

/// Feed raw host bytes through the line decoder into the service.
fn feed(rig: &mut Rig, decoder: &mut LineDecoder, bytes: &[u8]) {
    for &b in bytes {
        if let Some(line) = decoder.push(b) {
            rig.app
                .handle_line(line, rig.now_ms, &mut rig.hw, &mut rig.sink);
        }
    }
}

// ── Pump tokens ───────────────────────────────────────────────

#[test]
fn pump_tokens_drive_the_output_pair() {
    let mut rig = Rig::new();

    rig.line("PUMP ON");
    assert_eq!(rig.app.pump_state(), PumpState::Running);
    rig.line("PUMP RELEASE");
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    rig.line("PUMP OFF");
    assert_eq!(rig.app.pump_state(), PumpState::Idle);

    assert_eq!(
        rig.hw.calls,
        vec![
            ActuatorCall::Pump(PumpLines::DRIVE),
            ActuatorCall::Pump(PumpLines::RELEASE),
            ActuatorCall::Pump(PumpLines::OFF),
        ]
    );
}

#[test]
fn pump_off_is_idempotent() {
    let mut rig = Rig::new();
    rig.line("PUMP OFF");
    rig.line("PUMP OFF");
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert_eq!(rig.hw.pump_writes(), vec![PumpLines::OFF, PumpLines::OFF]);
    // No state change, so nothing to report.
    assert!(rig.sink.events.is_empty());
}

#[test]
fn repeated_pump_on_restarts_run_timer() {
    let mut rig = Rig::new();
    rig.line("PUMP ON");
    rig.run_until(20_000);
    rig.line("PUMP ON");

    rig.run_until(49_990);
    assert_eq!(rig.app.pump_state(), PumpState::Running);
    rig.run_until(50_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
}

// ── RESET / solenoid sweep ────────────────────────────────────

#[test]
fn reset_sweeps_every_channel_then_clears() {
    let mut rig = Rig::new();
    rig.line("RESET");

    rig.run_until(13_990);
    assert_eq!(
        rig.hw.solenoid_writes(),
        vec![0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40]
    );
    assert!(rig.app.sweep_active());

    rig.run_until(14_000);
    assert_eq!(rig.hw.solenoid_writes().len(), 8);
    assert_eq!(rig.hw.solenoid_writes().last(), Some(&0));
    assert!(!rig.app.sweep_active());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::SolenoidsCleared), 1);

    rig.run_until(30_000);
    assert_eq!(rig.hw.solenoid_writes().len(), 8);
}

#[test]
fn reset_during_sweep_is_ignored() {
    let mut rig = Rig::new();
    rig.line("RESET");
    rig.run_until(3_000);
    rig.line("RESET");
    assert_eq!(rig.app.active_solenoid(), Some(1));

    rig.run_until(14_000);
    assert_eq!(rig.hw.solenoid_writes().len(), 8);
}

#[test]
fn drop_reported_mid_sweep() {
    let mut rig = Rig::new();
    rig.line("RESET");
    rig.run_until(3_000);
    rig.hw.slots = 0b100_0000;
    rig.run_until(3_010);

    assert!(
        rig.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::Drop(d) if d.slot == 6 && d.at_ms == 3_010))
    );
    assert!(rig.app.sweep_active());
}

// ── Unknown tokens ────────────────────────────────────────────

#[test]
fn unknown_tokens_change_nothing() {
    let mut rig = Rig::new();
    for line in ["reset", "PUMP", "PUMP ON NOW", "PUMPON", "pump off", "HELLO", "DROP 3"] {
        rig.line(line);
    }
    rig.run_until(100);

    assert!(rig.hw.calls.is_empty());
    assert!(rig.sink.events.is_empty());
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(!rig.app.sweep_active());
}

/// Dispatch garbage and assert nothing observable moved.
fn assert_garbage_is_inert(rig: &mut Rig) {
    let state = rig.app.pump_state();
    let exercising = rig.app.exercise_active();
    let solenoid = rig.app.active_solenoid();
    let calls = rig.hw.calls.clone();
    let events = rig.sink.events.len();

    for line in ["PUMP", "pump on", "RESET NOW", "PUMP  OFF", "\u{7f}"] {
        rig.line(line);
    }

    assert_eq!(rig.app.pump_state(), state);
    assert_eq!(rig.app.exercise_active(), exercising);
    assert_eq!(rig.app.active_solenoid(), solenoid);
    assert_eq!(rig.hw.calls, calls);
    assert_eq!(rig.sink.events.len(), events);
}

#[test]
fn unknown_tokens_are_inert_in_every_state() {
    let mut rig = Rig::new();
    rig.line("PUMP ON");
    assert_eq!(rig.app.pump_state(), PumpState::Running);
    assert_garbage_is_inert(&mut rig);

    rig.line("PUMP RELEASE");
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    assert_garbage_is_inert(&mut rig);

    rig.line("PUMP OFF");
    rig.line("RESET");
    rig.run_until(3_000);
    assert_eq!(rig.app.active_solenoid(), Some(1));
    assert_garbage_is_inert(&mut rig);

    // Drop then clear: the pump exercise starts while the sweep runs on.
    rig.hw.slots = 0b100;
    rig.run_until(3_100);
    rig.hw.slots = 0;
    rig.run_until(3_200);
    assert!(rig.app.exercise_active());
    assert!(rig.app.sweep_active());
    assert_garbage_is_inert(&mut rig);

    rig.run_until(5_500);
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    assert!(rig.app.exercise_active());
    assert_garbage_is_inert(&mut rig);
}

// ── Framed byte stream ────────────────────────────────────────

#[test]
fn crlf_stream_dispatches_commands() {
    let mut rig = Rig::new();
    let mut decoder = LineDecoder::new();

    feed(&mut rig, &mut decoder, b"PUMP ");
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    feed(&mut rig, &mut decoder, b"ON\r\n\r\nbogus\r\n");
    assert_eq!(rig.app.pump_state(), PumpState::Running);

    feed(&mut rig, &mut decoder, b"PUMP OFF\nRESET\n");
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(rig.app.sweep_active());
}

#[test]
fn overlong_line_does_not_leak_a_command() {
    let mut rig = Rig::new();
    let mut decoder = LineDecoder::new();

    let mut junk = vec![b'#'; 40];
    junk.extend_from_slice(b"PUMP ON\r\n");
    feed(&mut rig, &mut decoder, &junk);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);

    feed(&mut rig, &mut decoder, b"PUMP ON\r\n");
    assert_eq!(rig.app.pump_state(), PumpState::Running);
}
