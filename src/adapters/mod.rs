//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                        |
//! |---------------|--------------|------------------------------------|
//! | `hardware`    | SensorPort   | 74HC165 chain, button GPIO         |
//! |               | ActuatorPort | 74HC595 chain, pump GPIO pair      |
//! | `serial_sink` | EventSink    | Host UART (`DROP`, `START`, `LOG`) |
//! | `time`        | —            | ESP32 high-resolution timer        |

pub mod hardware;
pub mod serial_sink;
pub mod time;
