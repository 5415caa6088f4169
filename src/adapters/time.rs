//! Monotonic clock adapter.
//!
//! The scheduler runs on a wrapping `u32` millisecond counter read once per
//! loop iteration.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic),
//!   truncated to milliseconds.  Wraps after ~49.7 days of uptime, which
//!   the scheduler's comparisons are written to survive.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot, wrapping at `u32::MAX`.
    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    /// Milliseconds since construction, wrapping at `u32::MAX`.
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
