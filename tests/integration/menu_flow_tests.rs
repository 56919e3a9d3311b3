//! Menu navigation flows driven through the full service, including the
//! clock-gating of the selection cycle and renderer-facing events.

use growlight::menu::{Button, Language, MenuSelection, SettingOption};

use crate::mock_hw::{Harness, MockClock};

#[test]
fn cycle_skips_clock_while_time_is_valid() {
    let mut h = Harness::with_defaults(MockClock::at(720));

    let expected = [
        MenuSelection::White,
        MenuSelection::Red,
        MenuSelection::Uv,
        MenuSelection::Presets,
        MenuSelection::Settings, // Clock skipped
        MenuSelection::AllChannels,
    ];
    for sel in expected {
        h.double_click(Button::Increment);
        assert_eq!(h.app.menu_state().selection, sel);
    }
}

#[test]
fn cycle_offers_clock_while_time_is_invalid() {
    let mut h = Harness::with_defaults(MockClock::unset());

    for _ in 0..5 {
        h.double_click(Button::Increment);
    }
    assert_eq!(h.app.menu_state().selection, MenuSelection::Clock);
    h.double_click(Button::Increment);
    assert_eq!(h.app.menu_state().selection, MenuSelection::Settings);
}

#[test]
fn connectivity_loss_reopens_the_clock_view() {
    let mut h = Harness::with_defaults(MockClock::at(720));

    for _ in 0..4 {
        h.double_click(Button::Increment);
    }
    assert_eq!(h.app.menu_state().selection, MenuSelection::Presets);

    // Drop connectivity: the very next cycle press must offer Clock.
    h.clock.connected = false;
    h.double_click(Button::Increment);
    assert_eq!(h.app.menu_state().selection, MenuSelection::Clock);
}

#[test]
fn informational_views_return_to_settings() {
    let mut h = Harness::with_defaults(MockClock::unset());

    h.long_press(Button::Decrement); // Settings home
    h.click(Button::Increment); // → PowerSave
    h.click(Button::Increment); // → ShowQr
    h.click(Button::Decrement); // activate
    assert_eq!(h.app.menu_state().selection, MenuSelection::ShowQr);

    h.click(Button::Increment);
    assert_eq!(h.app.menu_state().selection, MenuSelection::Settings);
    assert_eq!(h.app.menu_state().setting_option, SettingOption::ShowQr);
}

#[test]
fn menu_changes_are_emitted_for_the_renderer() {
    let mut h = Harness::with_defaults(MockClock::unset());
    h.double_click(Button::Increment);
    assert!(h.sink.contains("MenuChanged { selection: White }"));
}

#[test]
fn language_toggle_lands_in_saved_state() {
    let mut h = Harness::with_defaults(MockClock::unset());

    h.long_press(Button::Decrement);
    h.click(Button::Decrement); // activate Language
    assert_eq!(h.app.menu_state().language, Language::En);
    assert!(h.app.is_dirty(), "language change must schedule a save");
    assert_eq!(h.app.saved_state().language, Language::En);
}

#[test]
fn settings_suboption_cycles_and_wraps() {
    let mut h = Harness::with_defaults(MockClock::unset());
    h.long_press(Button::Decrement);

    let expected = [
        SettingOption::PowerSave,
        SettingOption::ShowQr,
        SettingOption::ShowHelp,
        SettingOption::Reboot,
        SettingOption::Language,
    ];
    for opt in expected {
        h.click(Button::Increment);
        assert_eq!(h.app.menu_state().setting_option, opt);
    }
}
