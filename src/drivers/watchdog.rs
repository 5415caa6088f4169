//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls.  The loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Reset the device if the loop goes quiet for this long.
#[cfg(target_os = "espidf")]
const TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: TIMEOUT_MS,
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
                    info!("Watchdog: subscribed ({}s timeout)", TIMEOUT_MS / 1000);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog.  Must be called more often than the timeout.
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
