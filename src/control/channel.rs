//! Dimmable lamp channel controller
//!
//! Owns one output channel's target/current value, fade progression, and
//! energy accounting.  The hardware sink is written through [`PwmPort`]
//! exactly once per actual value change; a channel that has converged on
//! its target performs no writes at all.

use serde::{Deserialize, Serialize};

use crate::app::ports::PwmPort;

/// Identity of one dimmable output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelId {
    White = 0,
    Red = 1,
    Uv = 2,
}

impl ChannelId {
    /// Total number of channels — used to size per-channel arrays.
    pub const COUNT: usize = 3;

    pub const ALL: [Self; Self::COUNT] = [Self::White, Self::Red, Self::Uv];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Elapsed intervals above this are treated as stale (first update after
/// boot, or a hang) and skipped for energy accrual.
const STALE_INTERVAL_MS: u32 = 600_000;

/// Current is considered converged when within this distance of target.
const FADE_EPSILON: f32 = 0.5;

pub struct ChannelController {
    id: ChannelId,
    /// Commanded value, 0-255 (UV additionally capped by `max_target`).
    target: u8,
    /// What the PWM is actually outputting right now; fractional so slow
    /// fades still make progress at high tick rates.
    current: f32,
    /// Step applied to `current` per update while fading.
    fade_step: f32,
    /// Upper clamp for `set_target` — 255 for white/red, the configured
    /// safety ceiling for UV.
    max_target: u8,
    /// Rated consumption at full duty (Watts).
    max_watts: f32,
    /// Accumulated consumption (Watt-hours). Monotone unless reset.
    energy_wh: f64,
    /// `None` until the first update; stale-interval guard.
    last_update_ms: Option<u32>,
}

impl ChannelController {
    pub fn new(id: ChannelId, max_watts: f32, fade_step: f32, max_target: u8) -> Self {
        Self {
            id,
            target: 0,
            current: 0.0,
            fade_step,
            max_target,
            max_watts,
            energy_wh: 0.0,
            last_update_ms: None,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Set the fade target.  Out-of-range values are clamped, never
    /// rejected.
    pub fn set_target(&mut self, value: i16) {
        self.target = value.clamp(0, self.max_target as i16) as u8;
    }

    /// Set target and current together, bypassing the fade, and write the
    /// hardware sink immediately.
    pub fn set_direct(&mut self, value: i16, pwm: &mut impl PwmPort) {
        self.set_target(value);
        self.current = f32::from(self.target);
        pwm.set_level(self.id, self.target);
    }

    /// Advance fade and energy state by one tick.
    ///
    /// Returns `true` if the output value changed (and was written to the
    /// sink); `false` means the channel is converged and nothing was
    /// written.
    pub fn update(&mut self, now_ms: u32, pwm: &mut impl PwmPort) -> bool {
        // Energy accrual. A stale or first interval is skipped entirely so
        // a reboot cannot book a spurious multi-hour spike.
        if let Some(last) = self.last_update_ms {
            let elapsed = now_ms.wrapping_sub(last);
            if elapsed > 0 && elapsed < STALE_INTERVAL_MS {
                let power_w = f64::from(self.current) / 255.0 * f64::from(self.max_watts);
                self.energy_wh += power_w * f64::from(elapsed) / 3_600_000.0;
            }
        }
        self.last_update_ms = Some(now_ms);

        // Fade: step toward target, clamping at the target so the output
        // never overshoots.
        let target = f32::from(self.target);
        if (self.current - target).abs() <= FADE_EPSILON {
            return false;
        }

        if self.current < target {
            self.current = (self.current + self.fade_step).min(target);
        } else {
            self.current = (self.current - self.fade_step).max(target);
        }

        pwm.set_level(self.id, self.current as u8);
        true
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn current(&self) -> u8 {
        self.current as u8
    }

    /// Accumulated consumption in Watt-hours.
    pub fn energy_wh(&self) -> f64 {
        self.energy_wh
    }

    /// Instantaneous power draw in Watts.
    pub fn power_w(&self) -> f32 {
        self.current / 255.0 * self.max_watts
    }

    /// Zero the energy counter.  Target and current are unaffected.
    pub fn reset_energy(&mut self) {
        self.energy_wh = 0.0;
    }

    /// Carry an accumulated total across a controller rebuild (config
    /// reload); keeps the meter monotone through hot reconfiguration.
    pub fn restore_energy(&mut self, energy_wh: f64) {
        self.energy_wh = energy_wh;
    }
}
