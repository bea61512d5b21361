//! ESP32 time adapter.
//!
//! Provides monotonic time for the rangefinder and the debouncer, plus
//! formatted wall-clock strings for the display and status payload.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic)
//!   and `gettimeofday`/`localtime_r` for wall-clock time (valid once
//!   SNTP has synced).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant`; the
//!   wall clock is derived from uptime so host runs stay deterministic.

use core::fmt::Write as _;

use crate::sensors::distance::MonotonicClock;

/// Time adapter for the ESP32-S3 platform.
#[derive(Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Wall-clock (h, m, s) once a sane time is available, else `None`.
    #[cfg(target_os = "espidf")]
    fn wall_clock_hms(&self) -> Option<(u8, u8, u8)> {
        self.wall_clock_tm()
            .map(|tm| (tm.tm_hour as u8, tm.tm_min as u8, tm.tm_sec as u8))
    }

    #[cfg(target_os = "espidf")]
    fn wall_clock_tm(&self) -> Option<esp_idf_svc::sys::tm> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unsynced time (e.g. before 2020-01-01).
        const EPOCH_2020: i64 = 1_577_836_800;
        if i64::from(tv.tv_sec) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        Some(tm)
    }

    #[cfg(not(target_os = "espidf"))]
    fn wall_clock_hms(&self) -> Option<(u8, u8, u8)> {
        None
    }

    /// Time of day as "HH:MM:SS".  Before the wall clock syncs this is
    /// derived from uptime, matching the original boot behaviour.
    pub fn time_of_day(&self) -> heapless::String<16> {
        let (h, m, s) = self.wall_clock_hms().unwrap_or_else(|| {
            let total = self.uptime_us() / 1_000_000;
            (
                ((total / 3600) % 24) as u8,
                ((total / 60) % 60) as u8,
                (total % 60) as u8,
            )
        });
        let mut out = heapless::String::new();
        let _ = write!(out, "{h:02}:{m:02}:{s:02}");
        out
    }

    /// Date as "DD/MM/YYYY", or a dashed placeholder before sync.
    pub fn date_string(&self) -> heapless::String<16> {
        let mut out = heapless::String::new();
        #[cfg(target_os = "espidf")]
        if let Some(tm) = self.wall_clock_tm() {
            let _ = write!(
                out,
                "{:02}/{:02}/{:04}",
                tm.tm_mday,
                tm.tm_mon + 1,
                tm.tm_year + 1900
            );
            return out;
        }
        let _ = write!(out, "--/--/----");
        out
    }
}

impl MonotonicClock for SystemClock {
    fn now_us(&self) -> u64 {
        self.uptime_us()
    }

    #[cfg(target_os = "espidf")]
    fn delay_us(&self, us: u32) {
        // SAFETY: esp_rom_delay_us is a plain busy-wait in ROM.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) }
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_us(&self, us: u32) {
        let until = self.uptime_us() + u64::from(us);
        while self.uptime_us() < until {
            core::hint::spin_loop();
        }
    }
}
