//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the command decoder and the pending-event scheduler
//! and exposes a single [`poll`](AppService::poll) that the control loop
//! calls once per iteration.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  serial byte ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//!    OutputPort ◀──│  Decoder · Scheduler    │
//!                  └────────────────────────┘
//! ```

use log::{debug, info};

use crate::pins;
use crate::protocol::{Command, CommandDecoder, Level};
use crate::scheduler::EventScheduler;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, OutputPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates the decode → dispatch → fire cycle.
pub struct AppService {
    decoder: CommandDecoder,
    scheduler: EventScheduler,
    stats: TelemetryData,
}

impl AppService {
    pub fn new() -> Self {
        Self {
            decoder: CommandDecoder::new(),
            scheduler: EventScheduler::new(),
            stats: TelemetryData::default(),
        }
    }

    /// Announce readiness through the sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("AppService started");
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one control-loop iteration.
    ///
    /// Order matters and mirrors the loop contract: due transitions fire
    /// first, then the decoder advances by at most the one byte the loop
    /// read this iteration (`None` when the link was idle).
    pub fn poll(
        &mut self,
        now_ms: u32,
        byte: Option<u8>,
        outputs: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        self.stats.fired += self.scheduler.run_due(now_ms, outputs) as u64;

        if let Some(b) = byte {
            if let Some(cmd) = self.decoder.feed(b) {
                self.dispatch(cmd, now_ms, outputs, sink);
            }
        }
    }

    // ── Command dispatch ──────────────────────────────────────

    /// Act on a fully-received command.
    ///
    /// Pin validation happens here, after the command's bytes are fully
    /// consumed, so rejection can never desynchronise the stream.  Failure
    /// is silent toward the host — there is no response channel — but
    /// observable through the sink.
    fn dispatch(
        &mut self,
        cmd: Command,
        now_ms: u32,
        outputs: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        if !pins::is_valid_output(cmd.pin()) {
            debug!("dispatch: rejected pin {}", cmd.pin());
            self.stats.rejected += 1;
            sink.emit(&AppEvent::CommandRejected { pin: cmd.pin() });
            return;
        }

        match cmd {
            Command::Set { pin, level } => {
                outputs.write_level(pin, level);
                self.stats.immediate_writes += 1;
            }

            Command::Pulse { pin, level, duration_ms } => {
                // Leading edge now, trailing edge scheduled.
                outputs.write_level(pin, level);
                self.stats.immediate_writes += 1;
                self.schedule(now_ms, duration_ms, pin, level.opposite(), sink);
            }

            Command::Delay { pin, level, duration_ms } => {
                self.schedule(now_ms, duration_ms, pin, level, sink);
            }
        }
    }

    fn schedule(
        &mut self,
        now_ms: u32,
        delay_ms: u16,
        pin: u8,
        level: Level,
        sink: &mut impl EventSink,
    ) {
        match self.scheduler.schedule(now_ms, delay_ms, pin, level) {
            Ok(()) => self.stats.scheduled += 1,
            Err(_) => {
                self.stats.dropped += 1;
                sink.emit(&AppEvent::QueueFull { pin });
            }
        }
    }

    // ── Introspection ─────────────────────────────────────────

    /// Counters snapshot with the live pending depth filled in.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            pending: self.scheduler.len(),
            ..self.stats
        }
    }

    /// Number of transitions currently pending.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Whether the decoder is mid-command.
    pub fn decoding_in_flight(&self) -> bool {
        self.decoder.in_flight()
    }
}

impl Default for AppService {
    fn default() -> Self {
        Self::new()
    }
}
