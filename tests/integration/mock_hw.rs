//! Mock hardware adapters for integration tests.
//!
//! Records every pin write and every emitted event so tests can assert on
//! the full history without touching real GPIO registers.

use pulsegate::app::events::AppEvent;
use pulsegate::app::ports::{EventSink, OutputPort};
use pulsegate::protocol::Level;

// ── Recording output port ─────────────────────────────────────

pub struct RecordingOutputs {
    pub writes: Vec<(u8, Level)>,
}

#[allow(dead_code)]
impl RecordingOutputs {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Most recent level written to `pin`.
    pub fn level_of(&self, pin: u8) -> Option<Level> {
        self.writes
            .iter()
            .rev()
            .find_map(|(p, l)| (*p == pin).then_some(*l))
    }

    pub fn writes_to(&self, pin: u8) -> usize {
        self.writes.iter().filter(|(p, _)| *p == pin).count()
    }
}

impl Default for RecordingOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for RecordingOutputs {
    fn write_level(&mut self, pin: u8, level: Level) {
        self.writes.push((pin, level));
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn rejections(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CommandRejected { pin } => Some(*pin),
                _ => None,
            })
            .collect()
    }

    pub fn queue_full_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::QueueFull { .. }))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
