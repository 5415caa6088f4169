//! Wire protocol for the host → device command link.
//!
//! Commands are 2 or 4 bytes on a fixed-baud UART stream:
//!
//! ```text
//! ┌────────┬───────┬─────────────────┐
//! │ opcode │  pin  │ duration (2B)   │
//! │  1 B   │  1 B  │ BE u16, ms —    │
//! │        │       │ Pulse/Delay only│
//! └────────┴───────┴─────────────────┘
//! ```
//!
//! | Opcode | Meaning                                              |
//! |--------|------------------------------------------------------|
//! | 1      | set pin ON now                                       |
//! | 2      | set pin OFF now                                      |
//! | 3      | set pin ON now, OFF after `duration_ms`              |
//! | 4      | set pin OFF now, ON after `duration_ms`              |
//! | 5      | set pin ON after `duration_ms`                       |
//! | 6      | set pin OFF after `duration_ms`                      |
//!
//! ON/OFF are logical levels; the configured [`Polarity`] maps them to
//! physical high/low at the hardware boundary, never per-command.
//! There is no response channel — malformed input is dropped silently.
//!
//! [`Polarity`]: crate::config::Polarity

pub mod decoder;

pub use decoder::CommandDecoder;

// ── Opcodes ───────────────────────────────────────────────────

pub mod opcode {
    pub const SET_ON: u8 = 1;
    pub const SET_OFF: u8 = 2;
    pub const PULSE_ON: u8 = 3;
    pub const PULSE_OFF: u8 = 4;
    pub const DELAY_ON: u8 = 5;
    pub const DELAY_OFF: u8 = 6;
}

// ── Logical level ─────────────────────────────────────────────

/// Logical output level as named by the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Off,
    On,
}

impl Level {
    /// The level a pulse relaxes back to.
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

// ── Decoded commands ──────────────────────────────────────────

/// A fully-received command, ready for dispatch.
///
/// Exists only between the last byte of a command arriving and the
/// dispatch that consumes it — nothing retains a `Command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply `level` to `pin` immediately.
    Set { pin: u8, level: Level },
    /// Apply `level` now, then the opposite level after `duration_ms`.
    Pulse { pin: u8, level: Level, duration_ms: u16 },
    /// Apply `level` after `duration_ms`, with no immediate write.
    Delay { pin: u8, level: Level, duration_ms: u16 },
}

impl Command {
    /// Target pin of this command.
    pub fn pin(&self) -> u8 {
        match *self {
            Self::Set { pin, .. } | Self::Pulse { pin, .. } | Self::Delay { pin, .. } => pin,
        }
    }
}

// ── Host-side encoding ────────────────────────────────────────

/// Encode a command into `out`, returning the number of bytes written
/// (2 for Set, 4 for Pulse/Delay).
///
/// The firmware itself never transmits; this is the reference encoding
/// used by tests, fuzzing, and host tooling.  Duration bytes are
/// big-endian: `d1 = ms / 256`, `d2 = ms % 256`.
pub fn encode(cmd: &Command, out: &mut [u8; 4]) -> usize {
    match *cmd {
        Command::Set { pin, level } => {
            out[0] = match level {
                Level::On => opcode::SET_ON,
                Level::Off => opcode::SET_OFF,
            };
            out[1] = pin;
            2
        }
        Command::Pulse { pin, level, duration_ms } => {
            out[0] = match level {
                Level::On => opcode::PULSE_ON,
                Level::Off => opcode::PULSE_OFF,
            };
            out[1] = pin;
            out[2..4].copy_from_slice(&duration_ms.to_be_bytes());
            4
        }
        Command::Delay { pin, level, duration_ms } => {
            out[0] = match level {
                Level::On => opcode::DELAY_ON,
                Level::Off => opcode::DELAY_OFF,
            };
            out[1] = pin;
            out[2..4].copy_from_slice(&duration_ms.to_be_bytes());
            4
        }
    }
}
