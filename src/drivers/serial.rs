//! UART command-link driver.
//!
//! Owns UART0, the byte stream from the host.  The only read primitive is
//! [`read_byte`](SerialLink::read_byte) — non-blocking, at most one byte —
//! matching the control loop's one-byte-per-iteration contract.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: installs the UART driver via raw sys calls.
//! On host/test: an in-memory queue that tests and the simulator fill
//! with [`inject`](SerialLink::inject).

use crate::error::SerialError;
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Driver-side receive buffer (bytes).  Absorbs host bursts between loop
/// iterations; the decoder still consumes one byte per iteration.
#[cfg(target_os = "espidf")]
const RX_BUFFER_SIZE: i32 = 256;

pub struct SerialLink {
    #[cfg(not(target_os = "espidf"))]
    rx: std::collections::VecDeque<u8>,
}

impl SerialLink {
    /// Install the UART driver on the link pins at `baud`.
    #[cfg(target_os = "espidf")]
    pub fn open(baud: u32) -> Result<Self, SerialError> {
        let port = pins::LINK_UART_NUM as i32;

        let cfg = uart_config_t {
            baud_rate: baud as i32,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };

        // SAFETY: UART bring-up runs once from main() before the control
        // loop; no concurrent access to the port is possible.
        unsafe {
            let ret = uart_param_config(port, &cfg);
            if ret != ESP_OK as i32 {
                return Err(SerialError::DriverInstallFailed(ret));
            }

            let ret = uart_set_pin(
                port,
                pins::LINK_TX_GPIO as i32,
                pins::LINK_RX_GPIO as i32,
                UART_PIN_NO_CHANGE,
                UART_PIN_NO_CHANGE,
            );
            if ret != ESP_OK as i32 {
                return Err(SerialError::PinAssignFailed(ret));
            }

            let ret = uart_driver_install(port, RX_BUFFER_SIZE, 0, 0, core::ptr::null_mut(), 0);
            if ret != ESP_OK as i32 {
                return Err(SerialError::DriverInstallFailed(ret));
            }
        }

        info!("serial: UART{} open at {} baud", port, baud);
        Ok(Self {})
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn open(baud: u32) -> Result<Self, SerialError> {
        log::info!("serial(sim): in-memory link, nominal {} baud", baud);
        Ok(Self {
            rx: std::collections::VecDeque::new(),
        })
    }

    /// Read at most one byte, without blocking.
    ///
    /// Returns `None` when no byte is waiting — the loop proceeds
    /// immediately.
    #[cfg(target_os = "espidf")]
    pub fn read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: single-byte read into a stack buffer with zero timeout;
        // the driver was installed in open().
        let n = unsafe {
            uart_read_bytes(
                pins::LINK_UART_NUM as i32,
                (&raw mut byte).cast(),
                1,
                0,
            )
        };
        (n == 1).then_some(byte)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    /// Queue bytes as if the host had sent them (host/test builds only).
    #[cfg(not(target_os = "espidf"))]
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }
}
