//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to the debug console in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | entering control loop");
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | imm={} sched={} fired={} rej={} drop={} pending={}",
                    t.immediate_writes, t.scheduled, t.fired, t.rejected, t.dropped, t.pending,
                );
            }
            AppEvent::CommandRejected { pin } => {
                warn!("CMD   | rejected invalid pin {}", pin);
            }
            AppEvent::QueueFull { pin } => {
                warn!("SCHED | pending collection full, dropped transition for pin {}", pin);
            }
        }
    }
}
