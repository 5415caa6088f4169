//! One-shot GPIO peripheral initialization.
//!
//! Configures every command-drivable pin as a digital output using raw
//! ESP-IDF sys calls, and parks it at the given physical level.  Called
//! once from `main()` before the control loop starts.

use embedded_hal::digital::PinState;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── GPIO outputs ──────────────────────────────────────────────

/// Configure all usable output pins and drive them to `park`.
///
/// `park` is the physical level for logical OFF under the deployment's
/// polarity — every output is quiescent before the first command.
#[cfg(target_os = "espidf")]
pub fn init_outputs(park: PinState) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    for pin in pins::usable_outputs() {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        gpio_write(pin, park);
    }
    info!(
        "hw_init: {} outputs configured, parked {:?}",
        pins::usable_outputs().count(),
        park
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_outputs(_park: PinState) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): GPIO init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: u8, state: PinState) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin membership was established by init_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin as i32, matches!(state, PinState::High) as u32);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: u8, _state: PinState) {}
