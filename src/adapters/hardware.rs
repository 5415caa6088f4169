//! GPIO bank adapter — bridges real output pins to the [`OutputPort`] trait.
//!
//! This is the only module in the write path that touches actual hardware,
//! and the only place the logical→physical polarity mapping is applied.
//! On non-espidf targets the underlying driver is a no-op and the bank
//! just tracks levels in memory.

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::ports::OutputPort;
use crate::config::Polarity;
use crate::drivers::hw_init;
use crate::pins;
use crate::protocol::Level;

/// Physical signal level for `level` under `polarity`.
pub fn physical(level: Level, polarity: Polarity) -> PinState {
    match (level, polarity) {
        (Level::On, Polarity::ActiveHigh) | (Level::Off, Polarity::ActiveLow) => PinState::High,
        (Level::Off, Polarity::ActiveHigh) | (Level::On, Polarity::ActiveLow) => PinState::Low,
    }
}

/// Concrete adapter driving the usable output pins.
pub struct GpioBank {
    polarity: Polarity,
    /// Last logical level written per GPIO, for diagnostics and tests.
    levels: [Option<Level>; pins::MAX_GPIO as usize + 1],
}

impl GpioBank {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            levels: [None; pins::MAX_GPIO as usize + 1],
        }
    }

    /// Physical level every output is parked at before the first command.
    pub fn park_state(&self) -> PinState {
        physical(Level::Off, self.polarity)
    }

    /// Last logical level written to `pin`, if any.
    pub fn level_of(&self, pin: u8) -> Option<Level> {
        self.levels.get(pin as usize).copied().flatten()
    }
}

impl OutputPort for GpioBank {
    fn write_level(&mut self, pin: u8, level: Level) {
        let state = physical(level, self.polarity);
        hw_init::gpio_write(pin, state);
        debug!("gpio: pin {} <- {:?} ({:?})", pin, level, state);
        if let Some(slot) = self.levels.get_mut(pin as usize) {
            *slot = Some(level);
        }
    }
}
