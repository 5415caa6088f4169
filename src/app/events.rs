//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial in production, collect in a
//! vector under test.
//!
//! Per-write events are deliberately absent: transitions can fire every
//! millisecond and the pin write itself is the observable effect.  The sink
//! carries the exceptional and the periodic, not the hot path.

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service is constructed and the control loop is about to start.
    Started,

    /// Periodic counters snapshot.
    Telemetry(TelemetryData),

    /// A fully-received command named a pin outside the usable output set.
    /// The command was consumed with no effect.
    CommandRejected { pin: u8 },

    /// The pending collection was at capacity; the new transition was
    /// dropped.
    QueueFull { pin: u8 },
}

/// A point-in-time counters snapshot suitable for logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryData {
    /// Immediate pin writes performed at dispatch (Set and the leading
    /// edge of Pulse).
    pub immediate_writes: u64,
    /// Transitions handed to the scheduler.
    pub scheduled: u64,
    /// Scheduled transitions that have fired.
    pub fired: u64,
    /// Commands consumed but rejected for an invalid pin.
    pub rejected: u64,
    /// Transitions dropped because the pending collection was full.
    pub dropped: u64,
    /// Transitions currently pending.
    pub pending: usize,
}
