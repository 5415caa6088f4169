//! Pending-event scheduler.
//!
//! Holds the time-ordered collection of delegated pin transitions and
//! executes them as their due times arrive.  The scheduler writes through
//! an [`OutputPort`] rather than touching hardware; the main loop injects
//! the real GPIO adapter, tests inject a recorder.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Control loop                        │
//! │                                                          │
//! │   run_due(now) ──▶ ┌──────────────────┐ ──▶ OutputPort   │
//! │                    │  EventScheduler  │                  │
//! │   schedule(..) ──▶ │  (sorted by due) │                  │
//! │                    └──────────────────┘                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is a wrapping `u32` millisecond counter.  All comparisons go
//! through [`due_reached`], which is correct across a single wrap as long
//! as no event is pending longer than half the counter range — delays are
//! capped at 65 535 ms by the wire format, so that holds with margin.

use crate::app::ports::OutputPort;
use crate::protocol::Level;
use heapless::Vec;
use log::debug;

/// Capacity of the pending collection (stack-allocated).
///
/// Commands take at least a few hundred microseconds of wire time each, so
/// more than a handful of in-flight transitions means the host is misusing
/// the link; overflow drops the new event, observably.
pub const MAX_PENDING_EVENTS: usize = 16;

/// A single delegated pin transition, waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEvent {
    /// Absolute due time on the wrapping millisecond clock.
    pub due_at_ms: u32,
    /// Target output pin.
    pub pin: u8,
    /// Logical level to apply when due.
    pub level: Level,
}

/// Returned by [`EventScheduler::schedule`] when the pending collection is
/// at capacity; the event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

/// `true` once `now` has reached or passed `due` on the wrapping clock.
///
/// Inclusive: an event due exactly at `now` fires.
fn due_reached(due: u32, now: u32) -> bool {
    now.wrapping_sub(due) < u32::MAX / 2
}

/// The pending-event engine.
pub struct EventScheduler {
    /// Pending events, always sorted by ascending due time.
    pending: Vec<PendingEvent, MAX_PENDING_EVENTS>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Insert a transition due `delay_ms` from `now_ms`.
    ///
    /// Insertion keeps the collection sorted by ascending due time and is
    /// stable on ties (the newer event goes after existing equals).  Linear
    /// scan — the collection stays small by construction.
    pub fn schedule(
        &mut self,
        now_ms: u32,
        delay_ms: u16,
        pin: u8,
        level: Level,
    ) -> Result<(), QueueFull> {
        let due_at_ms = now_ms.wrapping_add(delay_ms as u32);

        let idx = self
            .pending
            .iter()
            .position(|e| !due_reached(e.due_at_ms, due_at_ms))
            .unwrap_or(self.pending.len());

        self.pending
            .insert(idx, PendingEvent { due_at_ms, pin, level })
            .map_err(|_| QueueFull)?;

        debug!(
            "sched: pin {} -> {:?} in {} ms ({} pending)",
            pin,
            level,
            delay_ms,
            self.pending.len()
        );
        Ok(())
    }

    /// Execute and discard every event whose due time has arrived.
    ///
    /// A prefix scan: since the collection is sorted, the drain stops at the
    /// first event still in the future.  Returns the number of transitions
    /// fired.  Never blocks; bounded by the collection size at call time.
    pub fn run_due(&mut self, now_ms: u32, outputs: &mut impl OutputPort) -> usize {
        let mut fired = 0;
        while let Some(head) = self.pending.first().copied() {
            if !due_reached(head.due_at_ms, now_ms) {
                break;
            }
            self.pending.remove(0);
            debug!("fire: pin {} -> {:?} (due {})", head.pin, head.level, head.due_at_ms);
            outputs.write_level(head.pin, head.level);
            fired += 1;
        }
        fired
    }

    /// Number of events still pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending event, if any.
    pub fn next_due(&self) -> Option<u32> {
        self.pending.first().map(|e| e.due_at_ms)
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
