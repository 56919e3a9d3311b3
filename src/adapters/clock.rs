//! System wall-clock adapter.
//!
//! Implements [`ClockPort`] for the ESP32-S3 platform.
//!
//! - **`target_os = "espidf"`** — reads `gettimeofday()` / `localtime_r()`
//!   and writes manual adjustments back with `settimeofday()`.  Time is
//!   considered plausible only from 2022 onward; an unsynced RTC after a
//!   cold boot reports as invalid, which keeps the Clock view in the menu
//!   cycle and makes the schedule hold its last targets.
//! - **all other targets** — reports no valid time (host tests inject
//!   their own fake clocks).
//!
//! SNTP refreshes the system clock in the background once WiFi is up; this
//! adapter only *reads* the result.  Connectivity is pushed in by the main
//! loop so `is_valid()` can fold both conditions into the single query the
//! menu consumes.

use log::info;

use crate::app::ports::ClockPort;
use crate::error::TimeError;

/// Reject timestamps before 2022-01-01 UTC as "clock never set".
#[cfg(target_os = "espidf")]
const EPOCH_2022: i64 = 1_640_995_200;

pub struct SystemClockAdapter {
    connected: bool,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClockAdapter {
    pub fn new() -> Self {
        Self {
            connected: false,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX` ≈ 49 days).
    /// All control-core deadlines use wrap-safe arithmetic on this value.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1000) as u32
    }

    /// Milliseconds since construction (host builds).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Update the connectivity half of the validity query.  Called by the
    /// main loop from the WiFi adapter's state.
    pub fn set_connected(&mut self, connected: bool) {
        if connected != self.connected {
            info!(
                "clock: connectivity {}",
                if connected { "established" } else { "lost" }
            );
        }
        self.connected = connected;
    }

    /// Local time as (minutes-since-midnight), `None` while unsynced.
    #[cfg(target_os = "espidf")]
    fn local_minutes(&self) -> Option<u16> {
        use core::ptr;

        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: gettimeofday with a valid out-pointer and no timezone.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        if tv.tv_sec < EPOCH_2022 {
            return None;
        }

        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        // SAFETY: localtime_r writes into the provided tm buffer only.
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        if !(0..24).contains(&tm.tm_hour) || !(0..60).contains(&tm.tm_min) {
            return None;
        }
        Some((tm.tm_hour * 60 + tm.tm_min) as u16)
    }

    #[cfg(not(target_os = "espidf"))]
    fn local_minutes(&self) -> Option<u16> {
        None
    }
}

impl ClockPort for SystemClockAdapter {
    fn minutes_of_day(&self) -> Option<u16> {
        self.local_minutes()
    }

    fn is_valid(&self) -> bool {
        self.connected && self.local_minutes().is_some()
    }

    #[cfg(target_os = "espidf")]
    fn adjust(&mut self, delta_secs: i64) -> Result<(), TimeError> {
        use core::ptr;

        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: same contract as local_minutes().
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return Err(TimeError::ReadFailed);
        }
        tv.tv_sec += delta_secs as esp_idf_svc::sys::time_t;
        // SAFETY: settimeofday with a valid tv and no timezone.
        if unsafe { esp_idf_svc::sys::settimeofday(&tv, ptr::null_mut()) } != 0 {
            return Err(TimeError::AdjustFailed);
        }
        info!("clock: adjusted by {}s", delta_secs);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn adjust(&mut self, delta_secs: i64) -> Result<(), TimeError> {
        info!("clock(sim): adjust by {}s ignored", delta_secs);
        Ok(())
    }
}
