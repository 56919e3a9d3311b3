//! Port traits — the hexagonal boundary between control logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (PWM outputs, buttons, wall clock, event sinks, storage)
//! implement these traits.  The
//! [`ControllerService`](super::service::ControllerService) consumes them
//! via generics, so the control core never touches hardware directly and
//! every test runs on the host with mocks.

use crate::config::{SavedState, SystemConfig};
use crate::control::channel::ChannelId;
use crate::error::TimeError;

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → lamp hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the hardware sink for channel output values.
///
/// The core issues exactly one call per channel per actual value change;
/// implementations need no change-detection of their own.
pub trait PwmPort {
    /// Drive `channel` at `level` (0–255 duty).
    fn set_level(&mut self, channel: ChannelId, level: u8);
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Raw contact state of both buttons, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    /// Top button is currently pressed.
    pub increment: bool,
    /// Bottom button is currently pressed.
    pub decrement: bool,
}

/// Read-side port: the domain calls this once per tick for button levels.
pub trait InputPort {
    fn read_buttons(&mut self) -> ButtonLevels;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: wall clock ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock service.  The clock may be unavailable (pre-NTP, no
/// network); the schedule then holds its last targets and the menu offers
/// the manual Clock view.
pub trait ClockPort {
    /// Minutes since local midnight, or `None` while the clock is not
    /// plausibly set.
    fn minutes_of_day(&self) -> Option<u16>;

    /// True when the time is plausible *and* connectivity is established —
    /// the menu stops offering the Clock view while this holds.
    fn is_valid(&self) -> bool;

    /// Shift the wall clock by `delta_secs` (manual adjustment from the
    /// Clock view).
    fn adjust(&mut self, delta_secs: i64) -> Result<(), TimeError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT,
/// display refresh hints, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.  Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped — a compromised remote channel must not be able to inject
/// dangerous operating parameters (e.g. lifting the UV ceiling).
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;

    /// Load the last-known runtime state (channel targets, language,
    /// power-save).  Defaults on first boot.
    fn load_state(&self) -> Result<SavedState, ConfigError>;

    /// Persist the last-known runtime state.
    fn save_state(&self, state: &SavedState) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value blob storage.
///
/// Keys are namespaced to prevent collisions between subsystems; write
/// operations MUST be atomic (no partial writes on power loss — ESP-IDF
/// NVS guarantees this natively, the in-memory backend trivially).
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
