//! Fuzz target: `MenuNavigator::handle`
//!
//! Feeds arbitrary button/event/clock-offered sequences into the navigator
//! and asserts that the selection always stays inside the closed set and
//! that no combination panics.
//!
//! cargo fuzz run fuzz_menu_navigator

#![no_main]

use growlight::drivers::button::ButtonEvent;
use growlight::menu::{Button, MenuNavigator, MenuSelection};
use libfuzzer_sys::fuzz_target;

const SELECTIONS: [MenuSelection; MenuSelection::COUNT] = [
    MenuSelection::AllChannels,
    MenuSelection::White,
    MenuSelection::Red,
    MenuSelection::Uv,
    MenuSelection::Presets,
    MenuSelection::Clock,
    MenuSelection::Settings,
    MenuSelection::ShowQr,
    MenuSelection::ShowHelp,
];

fuzz_target!(|data: &[u8]| {
    let mut nav = MenuNavigator::new(25, 3600, 60);

    for byte in data {
        let button = if byte & 1 == 0 { Button::Increment } else { Button::Decrement };
        let event = match (byte >> 1) % 3 {
            0 => ButtonEvent::Single,
            1 => ButtonEvent::Double,
            _ => ButtonEvent::Long,
        };
        let clock_offered = byte & 0x80 != 0;

        let _ = nav.handle(button, event, clock_offered);
        assert!(SELECTIONS.contains(&nav.selection()));
    }
});
