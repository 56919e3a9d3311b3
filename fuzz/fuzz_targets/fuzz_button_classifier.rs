//! Fuzz target: `ButtonClassifier::update`
//!
//! Drives arbitrary raw-level/time-step sequences into the classifier and
//! asserts that it never panics and that time only moving forward never
//! produces more than one event per update.
//!
//! cargo fuzz run fuzz_button_classifier

#![no_main]

use growlight::drivers::button::{ButtonClassifier, ButtonEvent, ButtonTiming};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut classifier = ButtonClassifier::new(ButtonTiming::default());
    let mut now_ms: u32 = 0;
    let mut long_events = 0u32;
    let mut pressed_long = false;

    for byte in data {
        // Low bit is the raw level; remaining bits advance time 0-127 ms.
        let raw_active = byte & 1 != 0;
        now_ms = now_ms.wrapping_add(u32::from(byte >> 1));

        match classifier.update(raw_active, now_ms) {
            Some(ButtonEvent::Long) => {
                long_events += 1;
                // A second Long for the same press must not happen.
                assert!(!pressed_long, "Long fired twice for one press");
                pressed_long = true;
            }
            Some(_) => {}
            None => {}
        }
        if !raw_active {
            pressed_long = false;
        }
    }

    // Sanity: the classifier cannot emit more Long events than presses.
    let presses = data.windows(2).filter(|w| w[0] & 1 == 0 && w[1] & 1 == 1).count() as u32 + 1;
    assert!(long_events <= presses);
});
