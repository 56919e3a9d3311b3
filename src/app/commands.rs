//! Inbound commands to the controller service.
//!
//! These represent intents requested by the outside world (remote control
//! channels, serial console, startup restore) that the
//! [`ControllerService`](super::service::ControllerService) interprets and
//! acts upon.  The wire format that carries them is a collaborator's
//! concern; by the time a command reaches this enum it is already decoded.

use crate::config::SystemConfig;
use crate::control::channel::ChannelId;
use crate::menu::ChannelGroup;
use crate::presets::PresetId;

/// Commands that external adapters can send into the control core.
///
/// Every brightness-affecting variant has the same override semantics as
/// its button-driven counterpart: it forces the manual override active.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Nudge a channel group's brightness by a signed delta.
    Adjust { group: ChannelGroup, delta: i16 },

    /// Turn a channel group fully off.
    SetOff { group: ChannelGroup },

    /// Apply a catalog preset to all channels.
    ApplyPreset(PresetId),

    /// Set one channel's target directly (clamped, never rejected).
    SetTarget { channel: ChannelId, value: i16 },

    /// Switch power-save mode on or off.
    SetPowerSave(bool),

    /// Zero all channels' accumulated energy counters.
    ResetEnergy,

    /// Hot-reload configuration (e.g. from remote config or NVS).
    UpdateConfig(SystemConfig),

    /// Explicitly persist config and runtime state on the next save check.
    SaveConfig,
}
