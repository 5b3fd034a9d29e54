//! Application service, the hexagonal core.
//!
//! [`AppService`] owns every state machine in the controller and exposes a
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                 │           AppService          │
//! ActuatorPort ◀──│ Edge · Pump · Exercise · Sweep│
//!                 │ Button · Commands             │
//!                 └───────────────────────────────┘
//! ```
//!
//! Nothing here blocks.  Each [`tick`](AppService::tick) is handed the
//! current monotonic time and advances whatever is due.

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::control::exercise::{ExerciseStep, PumpExercise};
use crate::control::pump::{PumpController, PumpState};
use crate::control::solenoid::{SolenoidBank, SweepStep};
use crate::drivers::button::{ButtonEvent, ButtonMonitor};
use crate::error::Result;
use crate::sensors::{DropEvent, Edge, EdgeDetector, SensorFrame};

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: ControllerConfig,
    edges: EdgeDetector,
    pump: PumpController,
    exercise: PumpExercise,
    solenoids: SolenoidBank,
    button: ButtonMonitor,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            edges: EdgeDetector::new(),
            pump: PumpController::new(&config),
            exercise: PumpExercise::new(&config),
            solenoids: SolenoidBank::new(&config),
            button: ButtonMonitor::new(config.button_debounce_ms),
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every actuator to its off state and announce readiness.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started: run timeout {} ms, {} solenoid channels",
            self.config.pump_run_timeout_ms, self.config.solenoid_channels
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: watchdog → sequences → slot scan → button.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Pump watchdog
        let before = self.pump.state();
        if let Some(fault) = self.pump.watchdog(now_ms, hw) {
            sink.emit(&AppEvent::SafetyStop(fault));
            self.emit_pump_change(before, sink);
        }

        // 2. Pump exercise
        let before = self.pump.state();
        match self.exercise.poll(now_ms, &mut self.pump, hw) {
            Some(ExerciseStep::Releasing) => self.emit_pump_change(before, sink),
            Some(ExerciseStep::Finished) => {
                self.emit_pump_change(before, sink);
                sink.emit(&AppEvent::ExerciseFinished);
                info!("Pump exercise complete");
            }
            Some(ExerciseStep::Aborted) => {
                warn!("Pump exercise aborted: pump left the expected state");
                sink.emit(&AppEvent::ExerciseAborted);
            }
            None => {}
        }

        // 3. Solenoid sweep
        if let Some(step) = self.solenoids.poll(now_ms, hw) {
            self.emit_sweep_step(step, sink);
        }

        // 4. Slot sensors
        match hw.scan() {
            Ok(frame) => self.on_frame(frame, now_ms, hw, sink),
            Err(e) => warn!("Slot scan failed, skipping edge detection: {}", e),
        }

        // 5. Start button
        match hw.button_level() {
            Ok(pressed) => {
                if let Some(ButtonEvent::Start) = self.button.tick(now_ms, pressed) {
                    info!("Start button pressed");
                    sink.emit(&AppEvent::StartPressed);
                }
            }
            Err(e) => warn!("Button read failed: {}", e),
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Dispatch one framed line from the host.  Lines that are not an
    /// exact command token are ignored without a trace.
    pub fn handle_line(
        &mut self,
        line: &str,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(cmd) = Command::from_token(line) {
            self.handle_command(cmd, now_ms, hw, sink);
        }
    }

    /// Process a host command.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        info!("Command: {}", cmd.token());
        match cmd {
            Command::Reset => match self.solenoids.run_test_sweep(now_ms, hw) {
                Some(step) => self.emit_sweep_step(step, sink),
                None => info!("RESET ignored: sweep already in progress"),
            },
            Command::PumpOn | Command::PumpOff | Command::PumpRelease => {
                if self.exercise.cancel() {
                    info!("Pump exercise cancelled by {}", cmd.token());
                    sink.emit(&AppEvent::ExerciseAborted);
                }
                let before = self.pump.state();
                match cmd {
                    Command::PumpOn => self.pump.activate(now_ms, hw),
                    Command::PumpRelease => self.pump.release(now_ms, hw),
                    _ => self.pump.stop(hw),
                }
                self.emit_pump_change(before, sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn pump_state(&self) -> PumpState {
        self.pump.state()
    }

    pub fn exercise_active(&self) -> bool {
        self.exercise.is_active()
    }

    pub fn sweep_active(&self) -> bool {
        self.solenoids.is_sweeping()
    }

    /// Solenoid currently energised by a sweep.
    pub fn active_solenoid(&self) -> Option<u8> {
        self.solenoids.active_channel()
    }

    /// Most recent successful slot scan.
    pub fn last_frame(&self) -> SensorFrame {
        self.edges.last_frame()
    }

    /// Bitmask of every watchdog fault since boot.
    pub fn safety_faults(&self) -> u8 {
        self.pump.safety().faults()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Internal helpers ──────────────────────────────────────

    fn on_frame(
        &mut self,
        frame: SensorFrame,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match self.edges.detect(frame) {
            Edge::None => {}
            Edge::Rising(slot) => {
                info!("Puck in slot {} (frame 0b{:07b})", slot, frame.bits());
                sink.emit(&AppEvent::Drop(DropEvent { slot, at_ms: now_ms }));
            }
            Edge::Falling => {
                sink.emit(&AppEvent::SlotsCleared);
                if self.exercise.is_active() {
                    debug!("Slots cleared during pump exercise; ignored");
                    return;
                }
                let before = self.pump.state();
                if self.exercise.start(now_ms, &mut self.pump, hw) {
                    info!("Slots cleared; starting pump exercise");
                    sink.emit(&AppEvent::ExerciseStarted);
                    self.emit_pump_change(before, sink);
                }
            }
        }
    }

    fn emit_pump_change(&self, before: PumpState, sink: &mut impl EventSink) {
        let after = self.pump.state();
        if after != before {
            sink.emit(&AppEvent::PumpChanged {
                from: before,
                to: after,
            });
        }
    }

    fn emit_sweep_step(&self, step: SweepStep, sink: &mut impl EventSink) {
        match step {
            SweepStep::Energized(channel) => sink.emit(&AppEvent::SolenoidEnergized { channel }),
            SweepStep::Cleared => {
                info!("Solenoid sweep complete");
                sink.emit(&AppEvent::SolenoidsCleared);
            }
        }
    }
}
