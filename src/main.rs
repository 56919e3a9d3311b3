//! Growlight Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate control tick.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   SystemClock     │
//! │  (Input+Pwm)       (EventSink)    (Config+NVS) (ClockPort)     │
//! │  WifiAdapter       EspSntp                                     │
//! │  (Connectivity)    (time sync)                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControllerService (pure logic)              │    │
//! │  │  Buttons · Menu · Schedule · Channels                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
pub mod error;
mod events;
mod menu;
mod pins;
mod presets;
mod schedule;

pub mod app;
mod adapters;
mod control;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};

use adapters::clock::SystemClockAdapter;
use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::nvs::NvsAdapter;
use adapters::wifi::{ConnectivityPort, WifiAdapter};
use app::events::AppEvent;
use app::ports::{ClockPort, ConfigPort, EventSink, StoragePort};
use app::service::ControllerService;
use config::SystemConfig;
use drivers::watchdog::Watchdog;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Growlight v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Lamp PWM peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 3. Load config and last-known state from NVS ──────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS — nothing persists this session.
            // On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    let saved = nvs.load_state().unwrap_or_default();

    // ── 4. Button GPIOs (active-low, internal pull-ups) ───────
    // The typed pins below must match the assignments in pins.rs.
    const _: () = assert!(pins::BUTTON_INC_GPIO == 14 && pins::BUTTON_DEC_GPIO == 0);
    let peripherals = Peripherals::take()?;
    let mut inc_pin = PinDriver::input(peripherals.pins.gpio14)?;
    inc_pin.set_pull(Pull::Up)?;
    let mut dec_pin = PinDriver::input(peripherals.pins.gpio0)?;
    dec_pin.set_pull(Pull::Up)?;
    let mut hw = HardwareAdapter::new(inc_pin, dec_pin);

    // ── 5. WiFi + SNTP (best effort — the core runs without them) ──
    let sysloop = EspSystemEventLoop::take()?;
    let mut esp_wifi = EspWifi::new(peripherals.modem, sysloop, None)?;
    let mut wifi = WifiAdapter::new();

    let mut ssid_buf = [0u8; 32];
    let mut psk_buf = [0u8; 64];
    let creds = match (
        nvs.read("net", "ssid", &mut ssid_buf),
        nvs.read("net", "psk", &mut psk_buf),
    ) {
        (Ok(slen), Ok(plen)) => core::str::from_utf8(&ssid_buf[..slen])
            .ok()
            .zip(core::str::from_utf8(&psk_buf[..plen]).ok()),
        _ => None,
    };

    match creds {
        Some((ssid, psk)) => {
            esp_wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|_| anyhow::anyhow!("SSID too long"))?,
                password: psk.try_into().map_err(|_| anyhow::anyhow!("PSK too long"))?,
                ..Default::default()
            }))?;
            esp_wifi.start()?;
            if let Err(e) = wifi.set_credentials(ssid, psk) {
                warn!("WiFi credentials rejected: {}", e);
            } else if let Err(e) = wifi.connect() {
                warn!("WiFi initial connect failed: {} (retrying in background)", e);
            }
        }
        None => {
            warn!("no WiFi credentials in NVS; schedule holds until the clock is set manually");
        }
    }

    // Keep the SNTP client alive for the program's lifetime; it refreshes
    // the system clock whenever the station is up.
    let _sntp = EspSntp::new_default()?;

    // ── 6. Construct the control core ─────────────────────────
    let mut clock = SystemClockAdapter::new();
    let mut sink = LogEventSink::new();
    let mut app = ControllerService::new(config.clone(), &saved);
    app.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let ticks_per_sec = (1000 / config.control_loop_interval_ms).max(1) as u64;
    let telemetry_ticks = u64::from(config.telemetry_interval_secs) * ticks_per_sec;
    let mut loop_counter: u64 = 0;

    loop {
        loop_counter += 1;
        let now_ms = clock.uptime_ms();

        // Remote command intents, decoded elsewhere, drain into the
        // single-threaded control context here.
        events::drain_commands(|cmd| {
            app.handle_command(cmd, now_ms, &mut sink);
        });

        // One full control cycle: buttons → menu → schedule → fades.
        app.tick(now_ms, &mut hw, &mut clock, &mut sink);

        // Housekeeping at 1 Hz: connectivity upkeep feeds the clock
        // validity query the menu relies on.
        if loop_counter % ticks_per_sec == 0 {
            wifi.poll();
            clock.set_connected(wifi.is_connected());
        }

        if telemetry_ticks > 0 && loop_counter % telemetry_ticks == 0 {
            let t = app.build_telemetry(now_ms, clock.is_valid());
            sink.emit(&AppEvent::Telemetry(t));
        }

        // Persist config/state after the quiet period.
        app.auto_save_if_needed(&nvs);

        if app.take_reboot_request() {
            app.force_save_if_dirty(&nvs);
            info!("rebooting on user request");
            // SAFETY: esp_restart never returns; all state was flushed.
            unsafe { esp_idf_svc::sys::esp_restart() };
        }

        watchdog.feed();
        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
