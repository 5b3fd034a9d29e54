//! Puckdrop controller firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter        SerialEventSink      MonotonicClock  │
//! │  (Sensor + Actuator)    (EventSink, UART)    (esp_timer)     │
//! │                                                              │
//! │  ─────────────────── Port trait boundary ─────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                AppService (pure logic)                 │  │
//! │  │  Edge · Pump + watchdog · Exercise · Sweep · Button    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  LineDecoder (UART RX → commands) · task watchdog            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One cooperative loop at `control_loop_interval_ms`: drain the host
//! link, tick the service, feed the task watchdog, sleep.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::delay::{FreeRtos, NON_BLOCK};
use log::{info, warn};

use puckdrop::adapters::serial_sink::SerialEventSink;
use puckdrop::adapters::time::MonotonicClock;
use puckdrop::app::service::AppService;
use puckdrop::config::ControllerConfig;
use puckdrop::drivers::hw_init::{self, Board};
use puckdrop::drivers::watchdog::LoopWatchdog;
use puckdrop::link::LineDecoder;

/// Build-time configuration override (JSON), if any.
const CONFIG_JSON: Option<&str> = option_env!("PUCKDROP_CONFIG_JSON");

fn load_config() -> ControllerConfig {
    match CONFIG_JSON.map(ControllerConfig::from_json) {
        Some(Ok(cfg)) => {
            info!("Config: build-time override applied");
            cfg
        }
        Some(Err(e)) => {
            warn!("Config: build-time override rejected ({}), using defaults", e);
            ControllerConfig::default()
        }
        None => ControllerConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Puckdrop v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 3. Peripherals ────────────────────────────────────────
    let Board {
        hardware: mut hw,
        host_uart,
    } = hw_init::init_board(&config).context("board bring-up failed")?;
    let (uart_tx, uart_rx) = host_uart.into_split();
    let mut sink = SerialEventSink::new(uart_tx);
    let watchdog = LoopWatchdog::subscribe(&config);
    let clock = MonotonicClock::new();

    // ── 4. Application core ───────────────────────────────────
    let interval_ms = config.control_loop_interval_ms;
    let mut app = AppService::new(config).context("invalid controller config")?;
    app.start(&mut hw, &mut sink);

    let mut decoder = LineDecoder::new();
    let mut rx_buf = [0u8; 64];

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();

        // Host commands first, so a PUMP OFF lands before this tick's
        // watchdog and sequence checks.
        loop {
            let n = match uart_rx.read(&mut rx_buf, NON_BLOCK) {
                Ok(n) => n,
                Err(e) => {
                    warn!("Host link read failed: {}", e);
                    decoder.reset();
                    0
                }
            };
            if n == 0 {
                break;
            }
            for &byte in &rx_buf[..n] {
                if let Some(line) = decoder.push(byte) {
                    app.handle_line(line, now_ms, &mut hw, &mut sink);
                }
            }
        }

        app.tick(now_ms, &mut hw, &mut sink);

        watchdog.feed();
        FreeRtos::delay_ms(interval_ms);
    }
}
