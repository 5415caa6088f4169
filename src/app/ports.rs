//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO bank, event sinks, config storage) implement these
//! traits.  The [`AppService`](super::service::AppService) and the
//! [`EventScheduler`](crate::scheduler::EventScheduler) consume them via
//! generics, so the domain core never touches hardware directly.

use crate::config::SystemConfig;
use crate::protocol::Level;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive output pins.
///
/// Levels are *logical* ON/OFF — the adapter applies the configured
/// polarity when translating to a physical signal level.  Callers pass
/// only pins that passed [`pins::is_valid_output`](crate::pins::is_valid_output);
/// implementations may assume the pin is drivable.
pub trait OutputPort {
    /// Apply `level` to `pin`, synchronously.
    fn write_level(&mut self, pin: u8, level: Level);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go — the serial log in
/// production, a recording vector in tests.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.  Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
