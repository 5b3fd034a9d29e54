//! Control-loop watchdog on the ESP-IDF task watchdog (TWDT).
//!
//! Resets the controller when a loop iteration overruns
//! `device_watchdog_timeout_ms`.  The pump watchdog in [`crate::safety`]
//! bounds how long the pump runs; this one bounds the loop that enforces it.
//!
//! On the host there is no TWDT and the watchdog is never armed.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_delete,
    esp_task_wdt_reconfigure, esp_task_wdt_reset,
};
use log::{info, warn};

use crate::config::ControllerConfig;

pub struct LoopWatchdog {
    timeout_ms: u32,
    armed: bool,
}

impl LoopWatchdog {
    /// Subscribe the calling task.  A failed subscription is logged and
    /// leaves the watchdog unarmed; the loop keeps running without it.
    pub fn subscribe(config: &ControllerConfig) -> Self {
        let timeout_ms = config.device_watchdog_timeout_ms;
        let armed = arm(timeout_ms);
        if armed {
            info!("Loop watchdog armed: {timeout_ms} ms, panic on expiry");
        } else {
            warn!("Loop watchdog not armed");
        }
        Self { timeout_ms, armed }
    }

    /// Mark one loop iteration as complete.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.armed {
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

impl Drop for LoopWatchdog {
    fn drop(&mut self) {
        #[cfg(target_os = "espidf")]
        if self.armed {
            unsafe {
                esp_task_wdt_delete(core::ptr::null_mut());
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn arm(timeout_ms: u32) -> bool {
    let cfg = esp_task_wdt_config_t {
        timeout_ms,
        idle_core_mask: 0,
        trigger_panic: true,
    };
    // SAFETY: plain ESP-IDF calls on the current task handle (null).
    unsafe {
        let ret = esp_task_wdt_reconfigure(&cfg);
        if ret != ESP_OK {
            warn!("TWDT reconfigure returned {ret}");
        }
        let ret = esp_task_wdt_add(core::ptr::null_mut());
        if ret != ESP_OK {
            warn!("TWDT subscribe returned {ret}");
        }
        ret == ESP_OK
    }
}

#[cfg(not(target_os = "espidf"))]
fn arm(_timeout_ms: u32) -> bool {
    false
}
