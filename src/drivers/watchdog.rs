//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the control loop stalls.  The loop feeds it once
//! per tick; a tick that runs a full fan actuation sequence blocks for
//! several seconds, so the timeout must stay above the longest sequence
//! plus one tick interval.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Default TWDT timeout.
pub const WATCHDOG_TIMEOUT_MS: u32 = 20_000;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(WATCHDOG_TIMEOUT_MS)
    }
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): {} ms, no-op", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Whether a tick of `tick_ms` plus a blocking sequence of
    /// `blocking_ms` fits inside the timeout.
    pub fn covers(&self, tick_ms: u32, blocking_ms: u32) -> bool {
        tick_ms.saturating_add(blocking_ms) < self.timeout_ms
    }

    /// Feed the watchdog.  Must be called at least once per timeout.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
