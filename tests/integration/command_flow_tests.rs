//! Integration tests for the byte stream → decoder → dispatch pipeline.
//!
//! These drive [`AppService::poll`] exactly the way the control loop does:
//! one optional byte per iteration, monotonic time injected per call.

use crate::mock_hw::{RecordingOutputs, RecordingSink};
use pulsegate::app::service::AppService;
use pulsegate::protocol::{opcode, Level};
use pulsegate::scheduler::MAX_PENDING_EVENTS;

/// Feed a byte stream one byte per iteration at a fixed time.
fn feed(
    app: &mut AppService,
    now_ms: u32,
    bytes: &[u8],
    out: &mut RecordingOutputs,
    sink: &mut RecordingSink,
) {
    for b in bytes {
        app.poll(now_ms, Some(*b), out, sink);
    }
}

#[test]
fn set_on_writes_immediately() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[opcode::SET_ON, 9], &mut out, &mut sink);

    assert_eq!(out.writes, vec![(9, Level::On)]);
    assert_eq!(app.pending_events(), 0);
}

#[test]
fn set_off_writes_immediately() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[opcode::SET_OFF, 9], &mut out, &mut sink);

    assert_eq!(out.writes, vec![(9, Level::Off)]);
}

#[test]
fn pulse_pin5_on_for_250ms() {
    // Worked example from the wire protocol: [3, 5, 0, 250].
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[3, 5, 0, 250], &mut out, &mut sink);

    // Leading edge is synchronous with the final command byte.
    assert_eq!(out.writes, vec![(5, Level::On)]);
    assert_eq!(app.pending_events(), 1);

    // One iteration shy of due: nothing.
    app.poll(249, None, &mut out, &mut sink);
    assert_eq!(out.writes.len(), 1);

    // Due time reached: trailing edge, exactly once.
    app.poll(250, None, &mut out, &mut sink);
    assert_eq!(out.writes, vec![(5, Level::On), (5, Level::Off)]);

    app.poll(10_000, None, &mut out, &mut sink);
    assert_eq!(out.writes.len(), 2);
    assert_eq!(app.pending_events(), 0);
}

#[test]
fn delay_pin7_on_after_300ms() {
    // Worked example: [5, 7, 1, 44] → 1*256 + 44 = 300 ms.
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[5, 7, 1, 44], &mut out, &mut sink);

    // No immediate write for a Delay.
    assert!(out.writes.is_empty());
    assert_eq!(app.pending_events(), 1);

    app.poll(299, None, &mut out, &mut sink);
    assert!(out.writes.is_empty());

    app.poll(300, None, &mut out, &mut sink);
    assert_eq!(out.writes, vec![(7, Level::On)]);
}

#[test]
fn pulse_off_schedules_opposite_level() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[opcode::PULSE_OFF, 10, 0, 50], &mut out, &mut sink);
    assert_eq!(out.writes, vec![(10, Level::Off)]);

    app.poll(50, None, &mut out, &mut sink);
    assert_eq!(out.writes, vec![(10, Level::Off), (10, Level::On)]);
}

#[test]
fn invalid_pin_set_is_consumed_without_effect() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    // Pin 0 is reserved; the command must vanish silently.
    feed(&mut app, 0, &[opcode::SET_ON, 0], &mut out, &mut sink);
    assert!(out.writes.is_empty());
    assert_eq!(sink.rejections(), vec![0]);

    // The stream is not desynchronised: the next command decodes cleanly.
    feed(&mut app, 0, &[opcode::SET_ON, 5], &mut out, &mut sink);
    assert_eq!(out.writes, vec![(5, Level::On)]);
}

#[test]
fn invalid_pin_pulse_consumes_all_four_bytes() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    // GPIO 43 is the link TX pin — rejected, but all four bytes consumed.
    feed(&mut app, 0, &[opcode::PULSE_ON, 43, 0], &mut out, &mut sink);
    assert!(app.decoding_in_flight());
    feed(&mut app, 0, &[250], &mut out, &mut sink);
    assert!(!app.decoding_in_flight());
    assert!(out.writes.is_empty());
    assert_eq!(app.pending_events(), 0);
    assert_eq!(sink.rejections(), vec![43]);

    // Follow-up command is parsed from a clean state.
    feed(&mut app, 0, &[opcode::SET_OFF, 8], &mut out, &mut sink);
    assert_eq!(out.writes, vec![(8, Level::Off)]);
}

#[test]
fn invalid_pin_delay_schedules_nothing() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[opcode::DELAY_ON, 200, 1, 44], &mut out, &mut sink);
    assert_eq!(app.pending_events(), 0);

    app.poll(10_000, None, &mut out, &mut sink);
    assert!(out.writes.is_empty());
}

#[test]
fn unknown_opcodes_are_dropped_between_commands() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(
        &mut app,
        0,
        &[0, 99, 255, opcode::SET_ON, 9, 200, opcode::SET_OFF, 9],
        &mut out,
        &mut sink,
    );

    assert_eq!(out.writes, vec![(9, Level::On), (9, Level::Off)]);
    // Junk bytes are not commands — no rejection events either.
    assert!(sink.rejections().is_empty());
}

#[test]
fn slow_arrival_equals_burst_arrival() {
    // Feeding a stream with long idle gaps between bytes must decode the
    // same commands as a tight burst, as long as no due time intervenes.
    let stream = [
        opcode::SET_ON, 4,
        opcode::DELAY_OFF, 8, 0, 100,
        opcode::PULSE_ON, 5, 0, 200,
    ];

    // Burst: one byte per iteration, back to back.
    let mut burst_app = AppService::new();
    let (mut burst_out, mut burst_sink) = (RecordingOutputs::new(), RecordingSink::new());
    feed(&mut burst_app, 0, &stream, &mut burst_out, &mut burst_sink);

    // Slow: ten idle iterations between consecutive bytes.
    let mut slow_app = AppService::new();
    let (mut slow_out, mut slow_sink) = (RecordingOutputs::new(), RecordingSink::new());
    for b in &stream {
        for _ in 0..10 {
            slow_app.poll(0, None, &mut slow_out, &mut slow_sink);
        }
        slow_app.poll(0, Some(*b), &mut slow_out, &mut slow_sink);
    }

    assert_eq!(burst_out.writes, slow_out.writes);
    assert_eq!(burst_app.pending_events(), slow_app.pending_events());

    // Both pending transitions fire identically too.
    burst_app.poll(300, None, &mut burst_out, &mut burst_sink);
    slow_app.poll(300, None, &mut slow_out, &mut slow_sink);
    assert_eq!(burst_out.writes, slow_out.writes);
}

#[test]
fn queue_overflow_is_reported_and_non_fatal() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    for _ in 0..MAX_PENDING_EVENTS {
        feed(&mut app, 0, &[opcode::DELAY_ON, 5, 0, 100], &mut out, &mut sink);
    }
    assert_eq!(app.pending_events(), MAX_PENDING_EVENTS);

    // One more than capacity: dropped, reported, loop unharmed.
    feed(&mut app, 0, &[opcode::DELAY_ON, 5, 0, 100], &mut out, &mut sink);
    assert_eq!(app.pending_events(), MAX_PENDING_EVENTS);
    assert_eq!(sink.queue_full_count(), 1);

    // Immediate commands still work.
    feed(&mut app, 0, &[opcode::SET_ON, 9], &mut out, &mut sink);
    assert_eq!(out.level_of(9), Some(Level::On));

    app.poll(100, None, &mut out, &mut sink);
    assert_eq!(out.writes_to(5), MAX_PENDING_EVENTS);
}

#[test]
fn telemetry_counts_the_pipeline() {
    let mut app = AppService::new();
    let (mut out, mut sink) = (RecordingOutputs::new(), RecordingSink::new());

    feed(&mut app, 0, &[opcode::SET_ON, 9], &mut out, &mut sink);
    feed(&mut app, 0, &[opcode::PULSE_ON, 5, 0, 50], &mut out, &mut sink);
    feed(&mut app, 0, &[opcode::DELAY_OFF, 8, 0, 60], &mut out, &mut sink);
    feed(&mut app, 0, &[opcode::SET_ON, 0], &mut out, &mut sink); // rejected

    let t = app.build_telemetry();
    assert_eq!(t.immediate_writes, 2); // set + pulse leading edge
    assert_eq!(t.scheduled, 2); // pulse trailing edge + delay
    assert_eq!(t.rejected, 1);
    assert_eq!(t.pending, 2);
    assert_eq!(t.fired, 0);

    app.poll(60, None, &mut out, &mut sink);
    let t = app.build_telemetry();
    assert_eq!(t.fired, 2);
    assert_eq!(t.pending, 0);
}
