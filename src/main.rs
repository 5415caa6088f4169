//! PulseGate Firmware — Main Entry Point
//!
//! Delegated output-timer: the host fires short binary commands down UART0
//! and this loop executes the requested pin transitions at the right time,
//! with no further host involvement.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialLink      GpioBank       NvsAdapter     MonotonicClock  │
//! │  (UART0 bytes)   (OutputPort)   (ConfigPort)   (ms counter)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  CommandDecoder · EventScheduler                       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each loop iteration: drain due transitions, then feed at most one
//! link byte to the decoder.  No interrupts, no tasks — the iteration
//! rate alone bounds firing jitter.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod config;
mod error;
mod pins;
mod scheduler;

pub mod app;
pub mod protocol;
mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::GpioBank;
use adapters::log_sink::LogEventSink;
use adapters::nvs::NvsAdapter;
use adapters::time::MonotonicClock;
use app::events::AppEvent;
use app::ports::{ConfigPort, EventSink};
use app::service::AppService;
use config::SystemConfig;
use drivers::serial::SerialLink;
use drivers::watchdog::Watchdog;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PulseGate v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            None
        }
    };
    let config = match nvs.as_ref().map(|n| n.load()) {
        Some(Ok(cfg)) => {
            info!("Config loaded from NVS");
            cfg
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
        None => SystemConfig::default(),
    };
    // Keep the stored blob in step with the running firmware's schema.
    if let Some(n) = &nvs {
        if let Err(e) = n.save(&config) {
            warn!("Config persist failed: {}", e);
        }
    }

    // ── 3. Hardware bring-up ──────────────────────────────────
    let mut outputs = GpioBank::new(config.polarity);
    if let Err(e) = drivers::hw_init::init_outputs(outputs.park_state()) {
        // GPIO init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("GPIO init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    let mut link = SerialLink::open(config.link_baud)?;
    let clock = MonotonicClock::new();

    // ── 4. Construct app service ──────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AppService::new();
    app.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let telemetry_interval_ms = config.telemetry_interval_secs.saturating_mul(1_000);
    let mut last_telemetry_ms = clock.now_ms();

    loop {
        let now_ms = clock.now_ms();
        let byte = link.read_byte();
        let link_idle = byte.is_none();

        app.poll(now_ms, byte, &mut outputs, &mut sink);

        if now_ms.wrapping_sub(last_telemetry_ms) >= telemetry_interval_ms {
            sink.emit(&AppEvent::Telemetry(app.build_telemetry()));
            last_telemetry_ms = now_ms;
        }

        watchdog.feed();

        // Yield only when the link is quiet; during a burst the loop spins
        // so multi-byte commands complete within wire time.
        if link_idle && config.loop_delay_ms > 0 {
            #[cfg(target_os = "espidf")]
            esp_idf_hal::delay::FreeRtos::delay_ms(config.loop_delay_ms);

            #[cfg(not(target_os = "espidf"))]
            std::thread::sleep(std::time::Duration::from_millis(config.loop_delay_ms as u64));
        }
    }
}
