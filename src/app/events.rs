//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log to serial, publish to
//! a remote state topic, hint the display to redraw, etc.

use serde::Serialize;

use crate::control::channel::ChannelId;
use crate::menu::MenuSelection;
use crate::presets::PresetId;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Serialize)]
pub enum AppEvent {
    /// The controller service has started.
    Started,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// A channel's target changed (manual command, preset, or schedule).
    ChannelChanged { id: ChannelId, target: u8 },

    /// A preset was applied to all channels.
    PresetApplied(PresetId),

    /// The manual override engaged or reverted to automatic.
    OverrideChanged { manual: bool },

    /// The top-level menu selection moved.
    MenuChanged { selection: MenuSelection },

    /// Power-save mode was toggled.
    PowerSaveChanged(bool),

    /// The user requested a device reboot from the settings menu.
    RebootRequested,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryData {
    /// Per-channel targets, indexed white/red/uv.
    pub targets: [u8; 3],
    /// Per-channel current output values.
    pub currents: [u8; 3],
    /// Per-channel accumulated energy (Watt-hours).
    pub energy_wh: [f64; 3],
    /// Total instantaneous draw (Watts).
    pub power_w: f32,
    pub override_active: bool,
    /// Seconds until the override reverts (0 when automatic).
    pub override_remaining_secs: u32,
    pub power_save: bool,
    pub selection: MenuSelection,
    pub clock_valid: bool,
}
