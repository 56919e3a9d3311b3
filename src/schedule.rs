//! Daylight schedule engine and manual-override arbiter.
//!
//! Computes the automatic brightness target from time-of-day and arbitrates
//! it against an active manual override (direct adjustment, channel-off, or
//! preset).  Coexists with the menu navigator: brightness commands arrive
//! already resolved to a [`ChannelGroup`].
//!
//! ```text
//!  255 ┤        ┌────────────────┐
//!      │       /                  \
//!      │      /                    \
//!    0 ┼─────┘                      └─────
//!      └────┬────┬────────────┬────┬─────▶ minutes since midnight
//!        sunrise day       sunset night
//! ```
//!
//! The override is a tagged state, not a flag-plus-timestamp pair: either
//! the schedule runs, or a manual override with a concrete expiry is in
//! force.  Reversion happens silently at the first tick past the expiry
//! and reapplies the curve the same tick.

use log::info;

use crate::config::SystemConfig;
use crate::control::channel::{ChannelController, ChannelId};
use crate::menu::ChannelGroup;
use crate::presets::{self, PresetId};

/// The three channel controllers, indexed by `ChannelId`.
pub type Channels = [ChannelController; ChannelId::COUNT];

/// Arbitration state between the automatic schedule and the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// The daylight curve drives all channels.
    Automatic,
    /// A manual command is in force until `expires_at_ms` (monotonic).
    Manual { expires_at_ms: u32 },
}

pub struct ScheduleArbiter {
    sunrise_start_min: u16,
    day_start_min: u16,
    sunset_start_min: u16,
    night_start_min: u16,
    uv_ceiling: u8,
    timeout_ms: u32,
    state: Override,
}

impl ScheduleArbiter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sunrise_start_min: config.sunrise_start_min,
            day_start_min: config.day_start_min,
            sunset_start_min: config.sunset_start_min,
            night_start_min: config.night_start_min,
            uv_ceiling: config.uv_ceiling,
            timeout_ms: config.manual_timeout_secs.saturating_mul(1000),
            state: Override::Automatic,
        }
    }

    pub fn override_state(&self) -> Override {
        self.state
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.state, Override::Manual { .. })
    }

    /// Milliseconds until the override reverts; `None` when automatic.
    pub fn override_remaining_ms(&self, now_ms: u32) -> Option<u32> {
        match self.state {
            Override::Automatic => None,
            Override::Manual { expires_at_ms } => {
                if passed(now_ms, expires_at_ms) {
                    Some(0)
                } else {
                    Some(expires_at_ms.wrapping_sub(now_ms))
                }
            }
        }
    }

    // ── Per-tick arbitration ──────────────────────────────────

    /// Run one arbitration tick.
    ///
    /// While a manual override is unexpired only the expiry check runs; the
    /// curve is left unapplied.  At the first tick past the expiry the
    /// override clears and the curve is applied the same tick.  With no
    /// valid wall clock (`minutes = None`) the channels hold their last
    /// targets.
    pub fn tick(
        &mut self,
        now_ms: u32,
        minutes: Option<u16>,
        power_save: bool,
        channels: &mut Channels,
    ) {
        if let Override::Manual { expires_at_ms } = self.state {
            if !passed(now_ms, expires_at_ms) {
                return;
            }
            info!("schedule: manual override expired, resuming automatic");
            self.state = Override::Automatic;
        }

        if let Some(m) = minutes {
            self.apply_curve(m, power_save, channels);
        }
    }

    // ── Manual commands (all force the override active) ───────

    /// Nudge the selected channel group's brightness.  Clamping is silent.
    pub fn adjust(
        &mut self,
        group: ChannelGroup,
        delta: i16,
        now_ms: u32,
        channels: &mut Channels,
    ) {
        self.engage_manual(now_ms);
        for ch in Self::group_members(channels, group) {
            let target = i16::from(ch.target());
            ch.set_target(target + delta);
        }
    }

    /// Turn the selected channel group fully off.
    pub fn set_off(&mut self, group: ChannelGroup, now_ms: u32, channels: &mut Channels) {
        self.engage_manual(now_ms);
        for ch in Self::group_members(channels, group) {
            ch.set_target(0);
        }
    }

    /// Apply a catalog preset to all three channels, regardless of the
    /// current menu selection.
    pub fn apply_preset(&mut self, id: PresetId, now_ms: u32, channels: &mut Channels) {
        self.engage_manual(now_ms);
        let p = presets::get(id);
        info!("schedule: applying preset '{}'", p.label);
        channels[ChannelId::White.index()].set_target(i16::from(p.white));
        channels[ChannelId::Red.index()].set_target(i16::from(p.red));
        channels[ChannelId::Uv.index()].set_target(i16::from(p.uv));
    }

    /// Set a single channel's target directly (remote intent).  Forces the
    /// override like every other manual command.
    pub fn set_target(
        &mut self,
        id: ChannelId,
        value: i16,
        now_ms: u32,
        channels: &mut Channels,
    ) {
        self.engage_manual(now_ms);
        channels[id.index()].set_target(value);
    }

    /// Drop any manual override and reapply the curve immediately.
    pub fn force_automatic(
        &mut self,
        minutes: Option<u16>,
        power_save: bool,
        channels: &mut Channels,
    ) {
        if self.is_manual() {
            info!("schedule: manual override cleared by user");
        }
        self.state = Override::Automatic;
        if let Some(m) = minutes {
            self.apply_curve(m, power_save, channels);
        }
    }

    // ── Curve ─────────────────────────────────────────────────

    /// The automatic white/red target for a given time of day.
    pub fn automatic_target(&self, minutes: u16) -> u8 {
        let m = minutes;
        if m < self.sunrise_start_min || m >= self.night_start_min {
            0
        } else if m < self.day_start_min {
            map(m, self.sunrise_start_min, self.day_start_min, 0, 255)
        } else if m < self.sunset_start_min {
            255
        } else {
            map(m, self.sunset_start_min, self.night_start_min, 255, 0)
        }
    }

    fn apply_curve(&self, minutes: u16, power_save: bool, channels: &mut Channels) {
        let mut bri = i16::from(self.automatic_target(minutes));
        if power_save {
            bri /= 2;
        }
        // UV runs on a compressed scale: full daylight maps to the
        // configured ceiling, not to 255.
        let uv = bri * i16::from(self.uv_ceiling) / 255;

        channels[ChannelId::White.index()].set_target(bri);
        channels[ChannelId::Red.index()].set_target(bri);
        channels[ChannelId::Uv.index()].set_target(uv);
    }

    // ── Internal ──────────────────────────────────────────────

    fn engage_manual(&mut self, now_ms: u32) {
        self.state = Override::Manual {
            expires_at_ms: now_ms.wrapping_add(self.timeout_ms),
        };
    }

    fn group_members(
        channels: &mut Channels,
        group: ChannelGroup,
    ) -> impl Iterator<Item = &mut ChannelController> {
        channels.iter_mut().filter(move |ch| match group {
            ChannelGroup::All => true,
            ChannelGroup::Single(id) => ch.id() == id,
        })
    }
}

/// Wrap-safe "now has reached deadline" on monotonic millisecond clocks.
fn passed(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// Integer linear interpolation, Arduino `map` semantics.
fn map(x: u16, in_min: u16, in_max: u16, out_min: i16, out_max: i16) -> u8 {
    let x = i32::from(x);
    let (in_min, in_max) = (i32::from(in_min), i32::from(in_max));
    let (out_min, out_max) = (i32::from(out_min), i32::from(out_max));
    let v = (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    v.clamp(0, 255) as u8
}
