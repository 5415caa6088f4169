//! Unified error types for the PulseGate firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform.  All variants are
//! `Copy` so they can be passed around without allocation.  The command
//! path itself is error-free on purpose — malformed input is dropped
//! silently per the wire contract — so everything here concerns bring-up
//! and the link driver.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial command link failed.
    Serial(SerialError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(e) => write!(f, "serial: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Serial link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// UART driver install or parameter configuration failed.
    DriverInstallFailed(i32),
    /// Routing the UART to its pins failed.
    PinAssignFailed(i32),
    /// A read returned an error from the driver.
    ReadFailed(i32),
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverInstallFailed(rc) => write!(f, "UART driver install failed (rc={rc})"),
            Self::PinAssignFailed(rc) => write!(f, "UART pin assignment failed (rc={rc})"),
            Self::ReadFailed(rc) => write!(f, "UART read failed (rc={rc})"),
        }
    }
}

impl From<SerialError> for Error {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

impl std::error::Error for Error {}
impl std::error::Error for SerialError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
