//! System configuration parameters
//!
//! All tunable parameters for the PulseGate firmware.
//! Values can be overridden via NVS (non-volatile storage); there is no
//! runtime configuration channel — the command link carries only output
//! commands.

use serde::{Deserialize, Serialize};

/// Mapping between logical ON/OFF and the physical signal level.
///
/// Fixed per deployment: a low-side relay board wants `ActiveLow`, a
/// MOSFET gate driver wants `ActiveHigh`.  Never switched per-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Logical ON drives the pin high.
    ActiveHigh,
    /// Logical ON drives the pin low.
    ActiveLow,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Signal mapping ---
    /// Logical-to-physical level mapping for every output pin.
    pub polarity: Polarity,

    // --- Command link ---
    /// UART baud rate of the host link.
    pub link_baud: u32,

    // --- Timing ---
    /// Idle delay per control-loop iteration (milliseconds).  Bounds the
    /// worst-case firing jitter; 0 busy-spins.
    pub loop_delay_ms: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            polarity: Polarity::ActiveHigh,
            link_baud: 115_200,
            loop_delay_ms: 1,       // 1 kHz loop — jitter well under wire time
            telemetry_interval_secs: 60, // 1/min
        }
    }
}
