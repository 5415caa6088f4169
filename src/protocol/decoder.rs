//! Streaming command decoder.
//!
//! Reassembles commands from a byte stream that may arrive in arbitrarily
//! small fragments — one byte per control-loop iteration in the worst case.
//! The decoder holds at most one in-flight command; feeding the final byte
//! yields the completed [`Command`] and re-arms for the next opcode.
//!
//! Bytes that are not a recognised opcode while idle are dropped one at a
//! time.  The decoder never validates pins — that happens at dispatch, after
//! the command is fully consumed, so a bad pin can never desynchronise the
//! stream.

use super::{opcode, Command, Level};

/// Schedule class implied by the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Immediate write, no scheduling.
    Set(Level),
    /// Immediate or deferred write with a 16-bit duration parameter.
    Timed(TimedKind),
}

/// The two duration-carrying classes.  Split out so the duration-collection
/// states can never hold a `Set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimedKind {
    /// Immediate write, opposite level scheduled after the duration.
    Pulse(Level),
    /// Scheduled write only.
    Delay(Level),
}

impl Kind {
    fn from_opcode(byte: u8) -> Option<Self> {
        match byte {
            opcode::SET_ON => Some(Self::Set(Level::On)),
            opcode::SET_OFF => Some(Self::Set(Level::Off)),
            opcode::PULSE_ON => Some(Self::Timed(TimedKind::Pulse(Level::On))),
            opcode::PULSE_OFF => Some(Self::Timed(TimedKind::Pulse(Level::Off))),
            opcode::DELAY_ON => Some(Self::Timed(TimedKind::Delay(Level::On))),
            opcode::DELAY_OFF => Some(Self::Timed(TimedKind::Delay(Level::Off))),
            _ => None,
        }
    }
}

/// Decoder state machine — one variant per awaited byte.
#[derive(Debug, Clone, Copy)]
enum DecodeState {
    AwaitOpcode,
    AwaitPin { kind: Kind },
    AwaitDurationHigh { kind: TimedKind, pin: u8 },
    AwaitDurationLow { kind: TimedKind, pin: u8, high: u8 },
}

/// Streaming decoder for the 6-opcode wire protocol.
pub struct CommandDecoder {
    state: DecodeState,
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::AwaitOpcode,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(Command)` when this byte completes a command.
    /// Unrecognised opcode bytes are dropped without a state change.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            DecodeState::AwaitOpcode => {
                if let Some(kind) = Kind::from_opcode(byte) {
                    self.state = DecodeState::AwaitPin { kind };
                }
                None
            }

            DecodeState::AwaitPin { kind } => match kind {
                Kind::Set(level) => {
                    self.state = DecodeState::AwaitOpcode;
                    Some(Command::Set { pin: byte, level })
                }
                Kind::Timed(kind) => {
                    self.state = DecodeState::AwaitDurationHigh { kind, pin: byte };
                    None
                }
            },

            DecodeState::AwaitDurationHigh { kind, pin } => {
                self.state = DecodeState::AwaitDurationLow { kind, pin, high: byte };
                None
            }

            DecodeState::AwaitDurationLow { kind, pin, high } => {
                self.state = DecodeState::AwaitOpcode;
                let duration_ms = u16::from_be_bytes([high, byte]);
                match kind {
                    TimedKind::Pulse(level) => Some(Command::Pulse { pin, level, duration_ms }),
                    TimedKind::Delay(level) => Some(Command::Delay { pin, level, duration_ms }),
                }
            }
        }
    }

    /// Whether a command is partially received.
    pub fn in_flight(&self) -> bool {
        !matches!(self.state, DecodeState::AwaitOpcode)
    }

    /// Drop any partial command (e.g. after a link re-open).
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitOpcode;
    }
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}
