//! Integration tests for the full button → menu → schedule → channel
//! pipeline, driven tick-by-tick exactly like the firmware main loop.

use growlight::app::commands::AppCommand;
use growlight::app::ports::ConfigPort;
use growlight::adapters::nvs::NvsAdapter;
use growlight::config::{SavedState, SystemConfig};
use growlight::control::channel::ChannelId;
use growlight::menu::{Button, ChannelGroup, MenuSelection};
use growlight::presets::PresetId;
use growlight::schedule::Override;

use crate::mock_hw::{Harness, MockClock};

// ── Schedule end-to-end ───────────────────────────────────────

#[test]
fn daytime_schedule_fades_channels_up() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    // 2 s of ticks: plenty for a full 0→255 fade at 1.6/tick.
    h.run(200);

    assert_eq!(h.targets(), [255, 255, 204]);
    assert_eq!(h.app.channel(ChannelId::White).current(), 255);
    assert_eq!(h.app.channel(ChannelId::Uv).current(), 204);

    // The hardware saw a monotone ramp, not a jump.
    let white_writes: Vec<u8> = h
        .hw
        .writes
        .iter()
        .filter_map(|(ch, level)| (*ch == ChannelId::White).then_some(*level))
        .collect();
    assert!(white_writes.len() > 100, "fade should write many intermediate steps");
    assert!(white_writes.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn night_schedule_keeps_channels_dark_and_silent() {
    let mut h = Harness::with_defaults(MockClock::at(0));
    h.run(100);
    assert_eq!(h.targets(), [0, 0, 0]);
    assert!(
        h.hw.writes.is_empty(),
        "converged channels must not write the sink"
    );
}

#[test]
fn converged_channels_stop_writing() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    h.run(300);
    let writes_after_fade = h.hw.writes.len();
    h.run(100);
    assert_eq!(h.hw.writes.len(), writes_after_fade);
}

// ── Spec scenario: decrement double-press kills the channel ───

#[test]
fn double_press_decrement_turns_selected_channel_off() {
    let mut h = Harness::with_defaults(MockClock::unset());

    // Give the channels some brightness first.
    h.app
        .handle_command(AppCommand::Adjust { group: ChannelGroup::All, delta: 200 }, h.now_ms, &mut h.sink);
    h.run(1);
    assert_eq!(h.targets(), [200, 200, 200]);

    // Two press/releases of the bottom button ~160 ms apart.
    h.double_click(Button::Decrement);
    assert_eq!(h.targets(), [0, 0, 0]);
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));
}

#[test]
fn single_channel_view_scopes_adjustments() {
    let mut h = Harness::with_defaults(MockClock::unset());

    // Cycle into the White view, then bump brightness.
    h.double_click(Button::Increment);
    assert_eq!(h.app.menu_state().selection, MenuSelection::White);
    h.click(Button::Increment);
    assert_eq!(h.targets(), [25, 0, 0]);

    // And back down.
    h.click(Button::Decrement);
    assert_eq!(h.targets(), [0, 0, 0]);
}

// ── Override lifecycle ────────────────────────────────────────

#[test]
fn override_reverts_to_schedule_after_timeout() {
    let config = SystemConfig {
        manual_timeout_secs: 60,
        ..Default::default()
    };
    let mut h = Harness::new(config, SavedState::default(), MockClock::at(600));
    h.run(5);

    h.click(Button::Decrement); // -25 in the all-channels view
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));
    let engaged_at = h.now_ms;

    // Just before expiry the override still holds.
    h.run_until(engaged_at + 58_000);
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));

    // Past expiry it reverts and the daytime curve is reapplied.
    h.run_until(engaged_at + 61_000);
    assert_eq!(h.app.override_state(), Override::Automatic);
    assert_eq!(h.targets(), [255, 255, 204]);
}

#[test]
fn long_press_increment_clears_override_immediately() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    h.run(200);

    h.click(Button::Decrement);
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));
    assert_eq!(h.targets(), [230, 230, 179]);

    h.long_press(Button::Increment);
    assert_eq!(h.app.override_state(), Override::Automatic);
    assert_eq!(h.targets(), [255, 255, 204]);
}

#[test]
fn override_remaining_is_exposed_for_rendering() {
    let config = SystemConfig {
        manual_timeout_secs: 60,
        ..Default::default()
    };
    let mut h = Harness::new(config, SavedState::default(), MockClock::unset());
    h.click(Button::Increment);
    let remaining = h.app.override_remaining_ms(h.now_ms).unwrap();
    assert!(remaining <= 60_000);
    assert!(remaining > 55_000);
}

// ── Presets ───────────────────────────────────────────────────

#[test]
fn preset_preview_and_apply_via_buttons() {
    let mut h = Harness::with_defaults(MockClock::at(0));

    // Cycle into the Presets view.
    for _ in 0..4 {
        h.double_click(Button::Increment);
    }
    assert_eq!(h.app.menu_state().selection, MenuSelection::Presets);

    // Preview Seed → Veg → Bloom, then apply.
    h.click(Button::Increment);
    h.click(Button::Increment);
    assert_eq!(h.app.menu_state().viewing_preset, PresetId::Bloom);
    h.click(Button::Decrement);

    // Bloom forces the exact triple even though the schedule says 0.
    assert_eq!(h.targets(), [100, 255, 60]);
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));
    assert!(h.sink.contains("PresetApplied(Bloom)"));
}

// ── Clock view ────────────────────────────────────────────────

#[test]
fn clock_view_adjusts_wall_clock() {
    let mut h = Harness::with_defaults(MockClock::unset());

    // With an invalid clock, Clock is the fifth view in the cycle.
    for _ in 0..5 {
        h.double_click(Button::Increment);
    }
    assert_eq!(h.app.menu_state().selection, MenuSelection::Clock);

    h.click(Button::Increment);
    h.click(Button::Decrement);
    assert_eq!(h.clock.adjustments, vec![3600, 60]);
}

// ── Settings actions ──────────────────────────────────────────

#[test]
fn power_save_halves_the_daytime_curve() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    h.run(5);

    h.long_press(Button::Decrement); // jump into Settings
    h.click(Button::Increment); // Language → PowerSave
    h.click(Button::Decrement); // toggle
    assert!(h.app.power_save());
    assert!(h.sink.contains("PowerSaveChanged(true)"));

    h.run(200);
    assert_eq!(h.targets(), [127, 127, 101]);
}

#[test]
fn reboot_request_surfaces_once() {
    let mut h = Harness::with_defaults(MockClock::unset());

    h.long_press(Button::Decrement);
    for _ in 0..4 {
        h.click(Button::Increment); // Language → ... → Reboot
    }
    h.click(Button::Decrement);

    assert!(h.sink.contains("RebootRequested"));
    assert!(h.app.take_reboot_request());
    assert!(!h.app.take_reboot_request());
}

// ── Remote command intents ────────────────────────────────────

#[test]
fn remote_set_target_is_clamped_and_forces_override() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    h.run(5);

    h.app.handle_command(
        AppCommand::SetTarget { channel: ChannelId::Uv, value: 999 },
        h.now_ms,
        &mut h.sink,
    );
    assert_eq!(h.app.channel(ChannelId::Uv).target(), 204);
    assert!(matches!(h.app.override_state(), Override::Manual { .. }));
}

#[test]
fn remote_energy_reset_zeroes_all_meters() {
    let mut h = Harness::with_defaults(MockClock::at(600));
    h.run(500);
    assert!(h.app.channel(ChannelId::White).energy_wh() > 0.0);

    h.app
        .handle_command(AppCommand::ResetEnergy, h.now_ms, &mut h.sink);
    for id in ChannelId::ALL {
        assert_eq!(h.app.channel(id).energy_wh(), 0.0);
    }
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn runtime_state_auto_saves_after_quiet_period() {
    let mut h = Harness::with_defaults(MockClock::unset());
    let nvs = NvsAdapter::new().unwrap();

    h.app.handle_command(
        AppCommand::Adjust { group: ChannelGroup::All, delta: 80 },
        h.now_ms,
        &mut h.sink,
    );
    assert!(h.app.is_dirty());

    // Too soon: the debounce holds the write back.
    h.run(100); // 1 s
    assert!(!h.app.auto_save_if_needed(&nvs));

    h.run(500); // past the 5 s quiet period
    assert!(h.app.auto_save_if_needed(&nvs));
    assert!(!h.app.is_dirty());

    let restored = nvs.load_state().unwrap();
    assert_eq!(restored.targets, [80, 80, 80]);
}

#[test]
fn saved_state_restores_on_boot() {
    let nvs = NvsAdapter::new().unwrap();
    let state = SavedState {
        targets: [10, 20, 30],
        language: growlight::menu::Language::En,
        power_save: true,
    };
    nvs.save_state(&state).unwrap();

    let restored = nvs.load_state().unwrap();
    let h = Harness::new(SystemConfig::default(), restored, MockClock::unset());
    assert_eq!(h.targets(), [10, 20, 30]);
    assert!(h.app.power_save());
}
