//! GPIO pin map for the PulseGate main board (ESP32-S3-WROOM-1).
//!
//! Single source of truth — the dispatch path and the hardware adapter both
//! consult this module rather than hard-coding pin numbers.  Commands arrive
//! with a raw pin byte from the wire; [`is_valid_output`] is the only
//! validity oracle.

// ---------------------------------------------------------------------------
// Serial command link (UART0, routed to the host)
// ---------------------------------------------------------------------------

/// UART controller carrying the command byte stream.
pub const LINK_UART_NUM: u8 = 0;
/// U0TXD — reserved for the link, never a command target.
pub const LINK_TX_GPIO: u8 = 43;
/// U0RXD — reserved for the link, never a command target.
pub const LINK_RX_GPIO: u8 = 44;

// ---------------------------------------------------------------------------
// Output pin validity
// ---------------------------------------------------------------------------

/// Highest GPIO number present on the ESP32-S3.
pub const MAX_GPIO: u8 = 48;

/// GPIOs that must never be driven by a command:
/// - 0: boot strapping pin
/// - 19, 20: USB D−/D+
/// - 22–25: not bonded on the S3
/// - 26–32: SPI flash / PSRAM
/// - 43, 44: the command link itself
/// - 45, 46: strapping pins (VDD_SPI voltage, ROM log)
const RESERVED: &[u8] = &[0, 19, 20, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 43, 44, 45, 46];

/// Whether `pin` may be driven as a digital output by a wire command.
pub fn is_valid_output(pin: u8) -> bool {
    pin <= MAX_GPIO && !RESERVED.contains(&pin)
}

/// Iterator over every command-drivable output pin, in ascending order.
/// Used at boot to configure directions and park all outputs at OFF.
pub fn usable_outputs() -> impl Iterator<Item = u8> {
    (0..=MAX_GPIO).filter(|p| is_valid_output(*p))
}
