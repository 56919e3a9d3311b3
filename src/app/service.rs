//! Controller service — the hexagonal core.
//!
//! [`ControllerService`] owns the button classifiers, the menu navigator,
//! the schedule arbiter, and the three channel controllers.  It exposes a
//! clean, hardware-agnostic API; all I/O flows through port traits injected
//! at call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  InputPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!  ClockPort ──▶ │      ControllerService       │
//!    PwmPort ◀── │  Buttons · Menu · Schedule   │
//!                │        · Channels            │
//!                └─────────────────────────────┘
//! ```
//!
//! One call to [`tick`](ControllerService::tick) is one control cycle, and
//! the in-tick ordering is fixed: classify button input, feed events to the
//! navigator, run schedule arbitration, then advance channel fades and
//! energy.  A preset applied this tick is therefore visible in the same
//! tick's channel update.

use log::{info, warn};

use crate::config::{SavedState, SystemConfig};
use crate::control::channel::{ChannelController, ChannelId};
use crate::drivers::button::{ButtonClassifier, ButtonEvent, ButtonTiming};
use crate::menu::{Button, MenuEffect, MenuNavigator, MenuState};
use crate::schedule::{Channels, Override, ScheduleArbiter};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ClockPort, ConfigPort, EventSink, InputPort, PwmPort};

/// Seconds of quiet after the last change before state is auto-saved.
const AUTO_SAVE_DEBOUNCE_SECS: f32 = 5.0;

// ───────────────────────────────────────────────────────────────
// ControllerService
// ───────────────────────────────────────────────────────────────

/// The controller service orchestrates all domain logic.
pub struct ControllerService {
    config: SystemConfig,
    btn_inc: ButtonClassifier,
    btn_dec: ButtonClassifier,
    nav: MenuNavigator,
    arbiter: ScheduleArbiter,
    channels: Channels,
    power_save: bool,
    reboot_requested: bool,
    /// Seconds per control tick (derived from config).
    tick_secs: f32,
    tick_count: u64,
    state_dirty: bool,
    config_dirty: bool,
    dirty_since_tick: u64,
}

impl ControllerService {
    /// Construct the service from configuration and the last persisted
    /// runtime state.
    pub fn new(config: SystemConfig, saved: &SavedState) -> Self {
        let tick_secs = config.control_loop_interval_ms as f32 / 1000.0;
        let timing = ButtonTiming {
            debounce_ms: config.debounce_ms,
            double_click_ms: config.double_click_ms,
            long_press_ms: config.long_press_ms,
        };
        let mut nav = MenuNavigator::new(
            i16::from(config.brightness_step),
            config.clock_coarse_step_secs,
            config.clock_fine_step_secs,
        );
        nav.set_language(saved.language);

        let mut channels = build_channels(&config);
        for (ch, &target) in channels.iter_mut().zip(&saved.targets) {
            ch.set_target(i16::from(target));
        }

        let arbiter = ScheduleArbiter::new(&config);

        Self {
            config,
            btn_inc: ButtonClassifier::new(timing),
            btn_dec: ButtonClassifier::new(timing),
            nav,
            arbiter,
            channels,
            power_save: saved.power_save,
            reboot_requested: false,
            tick_secs,
            tick_count: 0,
            state_dirty: false,
            config_dirty: false,
            dirty_since_tick: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "ControllerService started: targets={:?}, power_save={}",
            self.targets(),
            self.power_save
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: buttons → menu → schedule → fades.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and [`PwmPort`]
    /// — this avoids a double mutable borrow while keeping the port
    /// boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl InputPort + PwmPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_targets = self.targets();
        let prev_menu = self.nav.state();
        let was_manual = self.arbiter.is_manual();

        // 1. Sample and classify button input.
        let levels = hw.read_buttons();
        let inc_event = self.btn_inc.update(levels.increment, now_ms);
        let dec_event = self.btn_dec.update(levels.decrement, now_ms);

        // 2. Navigation. The increment button is processed first; the
        // combined effect of same-tick events on both buttons is
        // deliberately unspecified.
        let clock_offered = !clock.is_valid();
        if let Some(event) = inc_event {
            self.dispatch_button(Button::Increment, event, now_ms, clock_offered, clock, sink);
        }
        if let Some(event) = dec_event {
            self.dispatch_button(Button::Decrement, event, now_ms, clock_offered, clock, sink);
        }

        // 3. Schedule arbitration (override expiry + automatic curve).
        self.arbiter
            .tick(now_ms, clock.minutes_of_day(), self.power_save, &mut self.channels);

        // 4. Advance fades and energy; channels write the sink themselves.
        for ch in &mut self.channels {
            ch.update(now_ms, hw);
        }

        // 5. Surface state changes to collaborators.
        self.emit_target_changes(prev_targets, sink);
        if self.arbiter.is_manual() != was_manual {
            sink.emit(&AppEvent::OverrideChanged {
                manual: self.arbiter.is_manual(),
            });
        }
        let menu = self.nav.state();
        if menu.selection != prev_menu.selection {
            sink.emit(&AppEvent::MenuChanged {
                selection: menu.selection,
            });
        }
        if menu.language != prev_menu.language {
            self.mark_state_dirty();
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (remote control channel, serial, boot
    /// restore).  Equivalent in effect to the corresponding button path.
    pub fn handle_command(&mut self, cmd: AppCommand, now_ms: u32, sink: &mut impl EventSink) {
        let prev_targets = self.targets();
        match cmd {
            AppCommand::Adjust { group, delta } => {
                self.arbiter.adjust(group, delta, now_ms, &mut self.channels);
            }
            AppCommand::SetOff { group } => {
                self.arbiter.set_off(group, now_ms, &mut self.channels);
            }
            AppCommand::ApplyPreset(id) => {
                self.arbiter.apply_preset(id, now_ms, &mut self.channels);
                sink.emit(&AppEvent::PresetApplied(id));
            }
            AppCommand::SetTarget { channel, value } => {
                self.arbiter.set_target(channel, value, now_ms, &mut self.channels);
            }
            AppCommand::SetPowerSave(on) => {
                if on != self.power_save {
                    self.power_save = on;
                    sink.emit(&AppEvent::PowerSaveChanged(on));
                    self.mark_state_dirty();
                }
            }
            AppCommand::ResetEnergy => {
                for ch in &mut self.channels {
                    ch.reset_energy();
                }
                info!("energy counters reset");
            }
            AppCommand::UpdateConfig(new_config) => {
                self.apply_config(new_config);
                self.mark_config_dirty();
                info!("configuration updated at runtime");
            }
            AppCommand::SaveConfig => {
                self.dirty_since_tick = 0;
                self.config_dirty = true;
                self.mark_state_dirty();
                info!("explicit save requested (will flush on next save check)");
            }
        }
        self.emit_target_changes(prev_targets, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self, now_ms: u32, clock_valid: bool) -> TelemetryData {
        TelemetryData {
            targets: self.targets(),
            currents: ChannelId::ALL.map(|id| self.channels[id.index()].current()),
            energy_wh: ChannelId::ALL.map(|id| self.channels[id.index()].energy_wh()),
            power_w: self.channels.iter().map(ChannelController::power_w).sum(),
            override_active: self.arbiter.is_manual(),
            override_remaining_secs: self
                .arbiter
                .override_remaining_ms(now_ms)
                .map_or(0, |ms| ms / 1000),
            power_save: self.power_save,
            selection: self.nav.selection(),
            clock_valid,
        }
    }

    /// Current menu state, for the renderer.
    pub fn menu_state(&self) -> MenuState {
        self.nav.state()
    }

    /// One channel controller, read-only.
    pub fn channel(&self, id: ChannelId) -> &ChannelController {
        &self.channels[id.index()]
    }

    /// Current per-channel targets, indexed white/red/uv.
    pub fn targets(&self) -> [u8; 3] {
        ChannelId::ALL.map(|id| self.channels[id.index()].target())
    }

    pub fn override_state(&self) -> Override {
        self.arbiter.override_state()
    }

    /// Milliseconds until the manual override reverts; `None` if automatic.
    pub fn override_remaining_ms(&self, now_ms: u32) -> Option<u32> {
        self.arbiter.override_remaining_ms(now_ms)
    }

    pub fn power_save(&self) -> bool {
        self.power_save
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Consume a pending reboot request (set from the settings menu).
    pub fn take_reboot_request(&mut self) -> bool {
        core::mem::take(&mut self.reboot_requested)
    }

    /// Snapshot of the state that is persisted across reboots.
    pub fn saved_state(&self) -> SavedState {
        SavedState {
            targets: self.targets(),
            language: self.nav.language(),
            power_save: self.power_save,
        }
    }

    /// Clone of the live configuration (for remote read-back).
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Persistence (dirty-flag debounce) ─────────────────────

    /// Check if auto-save should trigger (quiet period after last change).
    /// Returns `true` if anything was saved.
    pub fn auto_save_if_needed(&mut self, storage: &impl ConfigPort) -> bool {
        if !self.state_dirty && !self.config_dirty {
            return false;
        }
        let ticks_since_dirty = self.tick_count.saturating_sub(self.dirty_since_tick);
        if ticks_since_dirty as f32 * self.tick_secs < AUTO_SAVE_DEBOUNCE_SECS {
            return false;
        }
        self.flush(storage)
    }

    /// Force-save if dirty (call before reboot).
    pub fn force_save_if_dirty(&mut self, storage: &impl ConfigPort) {
        if self.state_dirty || self.config_dirty {
            let _ = self.flush(storage);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state_dirty || self.config_dirty
    }

    fn flush(&mut self, storage: &impl ConfigPort) -> bool {
        let mut saved = false;
        if self.config_dirty {
            match storage.save(&self.config) {
                Ok(()) => {
                    self.config_dirty = false;
                    saved = true;
                    info!("config saved");
                }
                Err(e) => warn!("config save failed: {}", e),
            }
        }
        if self.state_dirty {
            match storage.save_state(&self.saved_state()) {
                Ok(()) => {
                    self.state_dirty = false;
                    saved = true;
                    info!("runtime state saved");
                }
                Err(e) => warn!("state save failed: {}", e),
            }
        }
        saved
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch_button(
        &mut self,
        button: Button,
        event: ButtonEvent,
        now_ms: u32,
        clock_offered: bool,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let Some(effect) = self.nav.handle(button, event, clock_offered) else {
            return;
        };
        match effect {
            MenuEffect::Adjust(delta) => {
                if let Some(group) = self.nav.selection().channel_group() {
                    self.arbiter.adjust(group, delta, now_ms, &mut self.channels);
                }
            }
            MenuEffect::TurnOff => {
                if let Some(group) = self.nav.selection().channel_group() {
                    self.arbiter.set_off(group, now_ms, &mut self.channels);
                }
            }
            MenuEffect::ApplyPreset(id) => {
                self.arbiter.apply_preset(id, now_ms, &mut self.channels);
                sink.emit(&AppEvent::PresetApplied(id));
            }
            MenuEffect::AdjustClock(delta_secs) => {
                if let Err(e) = clock.adjust(delta_secs) {
                    warn!("clock adjust failed: {}", e);
                }
            }
            MenuEffect::ClearOverride => {
                self.arbiter
                    .force_automatic(clock.minutes_of_day(), self.power_save, &mut self.channels);
            }
            MenuEffect::TogglePowerSave => {
                self.power_save = !self.power_save;
                sink.emit(&AppEvent::PowerSaveChanged(self.power_save));
                self.mark_state_dirty();
            }
            MenuEffect::RebootRequested => {
                self.reboot_requested = true;
                sink.emit(&AppEvent::RebootRequested);
            }
        }
    }

    fn emit_target_changes(&mut self, prev: [u8; 3], sink: &mut impl EventSink) {
        let mut changed = false;
        for id in ChannelId::ALL {
            let target = self.channels[id.index()].target();
            if target != prev[id.index()] {
                sink.emit(&AppEvent::ChannelChanged { id, target });
                changed = true;
            }
        }
        if changed {
            self.mark_state_dirty();
        }
    }

    fn apply_config(&mut self, new_config: SystemConfig) {
        // The arbiter and classifiers are rebuilt with the new parameters;
        // an in-flight override or half-classified press does not survive a
        // config reload.
        let timing = ButtonTiming {
            debounce_ms: new_config.debounce_ms,
            double_click_ms: new_config.double_click_ms,
            long_press_ms: new_config.long_press_ms,
        };
        self.btn_inc = ButtonClassifier::new(timing);
        self.btn_dec = ButtonClassifier::new(timing);
        self.nav.set_steps(
            i16::from(new_config.brightness_step),
            new_config.clock_coarse_step_secs,
            new_config.clock_fine_step_secs,
        );
        self.arbiter = ScheduleArbiter::new(&new_config);
        self.tick_secs = new_config.control_loop_interval_ms as f32 / 1000.0;

        // Re-clamp current targets against the (possibly lowered) UV
        // ceiling by rebuilding the channel set and carrying values over.
        let targets = self.targets();
        let energies = ChannelId::ALL.map(|id| self.channels[id.index()].energy_wh());
        let mut channels = build_channels(&new_config);
        for (i, ch) in channels.iter_mut().enumerate() {
            ch.set_target(i16::from(targets[i]));
            ch.restore_energy(energies[i]);
        }
        self.channels = channels;
        self.config = new_config;
    }

    fn mark_state_dirty(&mut self) {
        if !self.state_dirty && !self.config_dirty {
            self.dirty_since_tick = self.tick_count;
        }
        self.state_dirty = true;
    }

    fn mark_config_dirty(&mut self) {
        if !self.state_dirty && !self.config_dirty {
            self.dirty_since_tick = self.tick_count;
        }
        self.config_dirty = true;
    }
}

fn build_channels(config: &SystemConfig) -> Channels {
    [
        ChannelController::new(ChannelId::White, config.white_max_watts, config.fade_step, 255),
        ChannelController::new(ChannelId::Red, config.red_max_watts, config.fade_step, 255),
        ChannelController::new(
            ChannelId::Uv,
            config.uv_max_watts,
            config.fade_step,
            config.uv_ceiling,
        ),
    ]
}
