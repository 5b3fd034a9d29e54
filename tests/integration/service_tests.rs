//! Integration tests for the AppService tick pipeline: slot edges, the
//! pump exercise, the pump watchdog and the start button.

use crate::mock_hw::{MockHardware, Rig};

use puckdrop::adapters::serial_sink::SerialEventSink;
use puckdrop::app::events::AppEvent;
use puckdrop::app::ports::PumpLines;
use puckdrop::app::service::AppService;
use puckdrop::config::ControllerConfig;
use puckdrop::control::pump::PumpState;
use puckdrop::error::SafetyFault;
use puckdrop::sensors::{DropEvent, SensorFrame};

/// Put a puck in `slots`, take it out, and return when the exercise began.
fn drop_and_clear(rig: &mut Rig, slots: u8) -> u64 {
    rig.hw.slots = slots;
    let t = rig.now_ms + 100;
    rig.run_until(t);
    rig.hw.slots = 0;
    rig.now_ms += 10;
    rig.tick();
    rig.now_ms
}

// ── Slot edges ────────────────────────────────────────────────

#[test]
fn drop_reports_lowest_slot_once() {
    let mut rig = Rig::new();

    rig.hw.slots = 0b001_0100;
    rig.run_until(100);
    // A second puck while the first is still there is not a new edge.
    rig.hw.slots = 0b001_0000;
    rig.run_until(200);

    let drops: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Drop(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(drops, vec![DropEvent { slot: 2, at_ms: 10 }]);
    assert_eq!(rig.app.last_frame(), SensorFrame::from_bits(0b001_0000));
}

#[test]
fn scan_failure_does_not_clear_slots() {
    let mut rig = Rig::new();
    rig.hw.slots = 0b1;
    rig.run_until(50);

    rig.hw.slots = 0;
    rig.hw.scan_fails = true;
    rig.run_until(500);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::SlotsCleared), 0);
    assert!(!rig.app.exercise_active());

    rig.hw.scan_fails = false;
    rig.run_until(510);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::SlotsCleared), 1);
    assert!(rig.app.exercise_active());
}

// ── Pump exercise ─────────────────────────────────────────────

#[test]
fn falling_edge_runs_drive_release_stop() {
    let mut rig = Rig::new();
    let t0 = drop_and_clear(&mut rig, 0b100);

    assert_eq!(rig.app.pump_state(), PumpState::Running);
    assert_eq!(rig.hw.pump_lines(), PumpLines::DRIVE);

    rig.run_until(t0 + 1_990);
    assert_eq!(rig.app.pump_state(), PumpState::Running);
    rig.run_until(t0 + 2_000);
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    assert_eq!(rig.hw.pump_lines(), PumpLines::RELEASE);

    rig.run_until(t0 + 3_990);
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    rig.run_until(t0 + 4_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(!rig.app.exercise_active());

    assert_eq!(
        rig.hw.pump_writes(),
        vec![PumpLines::DRIVE, PumpLines::RELEASE, PumpLines::OFF]
    );
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::Drop(DropEvent { slot: 2, at_ms: 10 }),
            AppEvent::SlotsCleared,
            AppEvent::ExerciseStarted,
            AppEvent::PumpChanged {
                from: PumpState::Idle,
                to: PumpState::Running
            },
            AppEvent::PumpChanged {
                from: PumpState::Running,
                to: PumpState::Releasing
            },
            AppEvent::PumpChanged {
                from: PumpState::Releasing,
                to: PumpState::Idle
            },
            AppEvent::ExerciseFinished,
        ]
    );
}

#[test]
fn falling_edge_during_exercise_is_ignored() {
    let mut rig = Rig::new();
    let t0 = drop_and_clear(&mut rig, 0b1);

    // Second puck mid-exercise: reported, but does not restart the cycle.
    rig.run_until(t0 + 500);
    rig.hw.slots = 0b100_0000;
    rig.run_until(t0 + 600);
    rig.hw.slots = 0;
    rig.run_until(t0 + 700);

    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::Drop(DropEvent { slot: 6, .. }))),
        1
    );
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ExerciseStarted), 1);

    // Release still happens on the original schedule.
    rig.run_until(t0 + 2_000);
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
}

#[test]
fn pump_command_cancels_exercise() {
    let mut rig = Rig::new();
    let t0 = drop_and_clear(&mut rig, 0b1);

    rig.run_until(t0 + 1_000);
    rig.line("PUMP OFF");
    assert!(!rig.app.exercise_active());
    assert_eq!(rig.app.pump_state(), PumpState::Idle);

    rig.run_until(t0 + 10_000);
    assert_eq!(rig.hw.pump_writes(), vec![PumpLines::DRIVE, PumpLines::OFF]);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ExerciseAborted), 1);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ExerciseFinished), 0);
}

#[test]
fn release_command_mid_exercise_holds_release() {
    let mut rig = Rig::new();
    let t0 = drop_and_clear(&mut rig, 0b1);

    rig.run_until(t0 + 500);
    rig.line("PUMP RELEASE");
    rig.run_until(t0 + 60_000);

    // Exercise gave up; release line stays on with no release timeout.
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    assert_eq!(rig.hw.pump_lines(), PumpLines::RELEASE);
}

// ── Pump watchdog ─────────────────────────────────────────────

#[test]
fn watchdog_stops_pump_at_run_timeout() {
    let mut rig = Rig::new();
    rig.line("PUMP ON");

    rig.run_until(29_990);
    assert_eq!(rig.app.pump_state(), PumpState::Running);
    rig.run_until(30_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert_eq!(rig.hw.pump_lines(), PumpLines::OFF);

    assert!(
        rig.sink
            .events
            .contains(&AppEvent::SafetyStop(SafetyFault::RunTimeout))
    );
    assert_eq!(rig.app.safety_faults(), SafetyFault::RunTimeout.mask());
}

#[test]
fn watchdog_aborts_long_exercise() {
    let config = ControllerConfig {
        exercise_drive_ms: 40_000,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config);
    let t0 = drop_and_clear(&mut rig, 0b1);

    rig.run_until(t0 + 30_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(!rig.app.exercise_active());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ExerciseAborted), 1);

    rig.run_until(t0 + 50_000);
    assert_eq!(rig.hw.pump_writes(), vec![PumpLines::DRIVE, PumpLines::OFF]);
}

#[test]
fn watchdog_keeps_running_during_sweep() {
    let config = ControllerConfig {
        solenoid_hold_ms: 10_000,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config);
    rig.line("RESET");
    rig.line("PUMP ON");

    rig.run_until(30_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(rig.app.sweep_active());
    assert_eq!(rig.app.active_solenoid(), Some(3));
}

#[test]
fn optional_release_timeout() {
    let config = ControllerConfig {
        pump_release_timeout_ms: Some(5_000),
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config);
    rig.line("PUMP RELEASE");

    rig.run_until(4_990);
    assert_eq!(rig.app.pump_state(), PumpState::Releasing);
    rig.run_until(5_000);
    assert_eq!(rig.app.pump_state(), PumpState::Idle);
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::SafetyStop(SafetyFault::ReleaseTimeout))
    );
}

// ── Start button ──────────────────────────────────────────────

#[test]
fn button_release_emits_start() {
    let mut rig = Rig::new();
    rig.hw.button = true;
    rig.run_until(50);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::StartPressed), 0);

    rig.hw.button = false;
    rig.run_until(60);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::StartPressed), 1);

    rig.run_until(500);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::StartPressed), 1);
}

// ── Wire output ───────────────────────────────────────────────

#[test]
fn host_sees_drop_and_start_lines() {
    let mut app = AppService::new(ControllerConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = SerialEventSink::new(String::new());

    app.start(&mut hw, &mut sink);
    hw.slots = 0b000_1000;
    hw.button = true;
    app.tick(10, &mut hw, &mut sink);
    hw.button = false;
    app.tick(20, &mut hw, &mut sink);

    assert_eq!(sink.get_ref(), "LOG ready\r\nDROP 3\r\nSTART\r\n");
}
