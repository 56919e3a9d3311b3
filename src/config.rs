//! System configuration parameters
//!
//! All tunable parameters for the Growlight controller.
//! Values can be overridden via NVS (non-volatile storage) or remote config.

use serde::{Deserialize, Serialize};

use crate::menu::Language;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Daylight schedule (minutes since midnight) ---
    /// Start of the sunrise ramp (brightness 0 → 255)
    pub sunrise_start_min: u16,
    /// Full daylight reached
    pub day_start_min: u16,
    /// Start of the sunset ramp (brightness 255 → 0)
    pub sunset_start_min: u16,
    /// Lights fully off
    pub night_start_min: u16,

    // --- Manual override ---
    /// How long a manual adjustment suppresses the schedule (seconds)
    pub manual_timeout_secs: u32,

    // --- Channels ---
    /// Fade step applied to a channel's current value each control tick
    pub fade_step: f32,
    /// Brightness delta for one increment/decrement button press
    pub brightness_step: u8,
    /// UV channel safety ceiling (0-255); UV targets are clamped to this
    pub uv_ceiling: u8,
    /// Rated consumption at full duty, per channel (Watts)
    pub white_max_watts: f32,
    pub red_max_watts: f32,
    pub uv_max_watts: f32,

    // --- Buttons ---
    /// Contact debounce window (milliseconds)
    pub debounce_ms: u32,
    /// Maximum gap between two releases to count as a double click (ms)
    pub double_click_ms: u32,
    /// Hold duration that triggers a long press (ms)
    pub long_press_ms: u32,

    // --- Clock adjustment ---
    /// Seconds added per increment press in the Clock view
    pub clock_coarse_step_secs: i64,
    /// Seconds added per decrement press in the Clock view
    pub clock_fine_step_secs: i64,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Schedule: 05:30 ramp-up, 07:30 full, 20:00 ramp-down, 22:00 off
            sunrise_start_min: 330,
            day_start_min: 450,
            sunset_start_min: 1200,
            night_start_min: 1320,

            // Override
            manual_timeout_secs: 45 * 60,

            // Channels
            fade_step: 1.6,
            brightness_step: 25,
            uv_ceiling: 204,
            white_max_watts: 10.0,
            red_max_watts: 10.0,
            uv_max_watts: 8.0,

            // Buttons
            debounce_ms: 50,
            double_click_ms: 500,
            long_press_ms: 1000,

            // Clock
            clock_coarse_step_secs: 3600,
            clock_fine_step_secs: 60,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz — smooth fades
            telemetry_interval_secs: 60,  // 1/min
        }
    }
}

/// Last-known runtime state, persisted across reboots and restored at boot.
///
/// Distinct from [`SystemConfig`]: this is what the user last *did*, not
/// how the device is tuned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// Last channel targets (white, red, uv).
    pub targets: [u8; 3],
    pub language: Language,
    pub power_save: bool,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            targets: [0, 0, 0],
            language: Language::Sv,
            power_save: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.sunrise_start_min < c.day_start_min);
        assert!(c.day_start_min < c.sunset_start_min);
        assert!(c.sunset_start_min < c.night_start_min);
        assert!(c.night_start_min < 24 * 60);
        assert!(c.fade_step > 0.0);
        assert!(c.brightness_step > 0);
        assert!(c.manual_timeout_secs > 0);
        assert!(c.control_loop_interval_ms > 0);
    }

    #[test]
    fn button_timing_ordering() {
        let c = SystemConfig::default();
        assert!(
            c.debounce_ms < c.double_click_ms,
            "debounce must be shorter than the double-click window"
        );
        assert!(
            c.debounce_ms < c.long_press_ms,
            "debounce must be shorter than the long-press threshold"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.sunrise_start_min, c2.sunrise_start_min);
        assert_eq!(c.uv_ceiling, c2.uv_ceiling);
        assert!((c.fade_step - c2.fade_step).abs() < 0.001);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = SystemConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: SystemConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.manual_timeout_secs, c2.manual_timeout_secs);
        assert!((c.white_max_watts - c2.white_max_watts).abs() < 0.001);
    }

    #[test]
    fn saved_state_postcard_roundtrip() {
        let s = SavedState {
            targets: [100, 255, 60],
            language: Language::En,
            power_save: true,
        };
        let bytes = postcard::to_allocvec(&s).unwrap();
        let s2: SavedState = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(s, s2);
    }
}
