//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | InputPort          | Button GPIOs             |
//! |            | PwmPort            | LEDC lamp channels       |
//! | `clock`    | ClockPort          | System wall clock / SNTP |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `nvs`      | ConfigPort         | NVS / in-memory store    |
//! |            | StoragePort        |                          |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod clock;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod wifi;
