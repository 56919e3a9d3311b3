//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Telemetry snapshots are emitted as single JSON lines so a serial
//! harness can scrape them without a custom parser; a future MQTT adapter
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialisation failed: {}", e),
            },
            AppEvent::ChannelChanged { id, target } => {
                info!("LIGHT | {:?} target={}", id, target);
            }
            AppEvent::PresetApplied(id) => {
                info!("PRESET | {:?} applied", id);
            }
            AppEvent::OverrideChanged { manual } => {
                info!(
                    "SCHED | {}",
                    if *manual { "manual override engaged" } else { "automatic schedule resumed" }
                );
            }
            AppEvent::MenuChanged { selection } => {
                info!("MENU | {:?}", selection);
            }
            AppEvent::PowerSaveChanged(on) => {
                info!("POWER | power-save {}", if *on { "on" } else { "off" });
            }
            AppEvent::RebootRequested => {
                warn!("SYS | reboot requested from settings menu");
            }
            AppEvent::Started => {
                info!("SYS | controller started");
            }
        }
    }
}
