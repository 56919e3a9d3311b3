//! Debounced button classifier with single, double, and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The main loop samples the raw
//! level once per control tick and feeds it to [`ButtonClassifier::update`]
//! together with a monotonic millisecond clock; all timing decisions are
//! made on the injected clock, never on wall time.
//!
//! ## Gesture detection
//!
//! | Gesture | Condition                                  | Event    |
//! |---------|--------------------------------------------|----------|
//! | Single  | Release, no second press within 500 ms     | `Single` |
//! | Double  | Second press begins within 500 ms          | `Double` |
//! | Long    | Hold >= 1 s                                | `Long`   |
//!
//! Long-press detection always wins: once `Long` fires for a press, the
//! release emits nothing and any pending double-click wait is cancelled.
//! At most one event is emitted per `update` call.

use embedded_hal::digital::InputPin;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Single,
    Double,
    Long,
}

/// Debounce and gesture windows, injectable for testing.
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    pub debounce_ms: u32,
    pub double_click_ms: u32,
    pub long_press_ms: u32,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            double_click_ms: 500,
            long_press_ms: 1000,
        }
    }
}

/// Debounced edge on the contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Press,
    Release,
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    /// Button held down. `is_second` marks the second press of a
    /// double-click candidate.
    Pressed { since_ms: u32, is_second: bool },
    /// `Long` already emitted for this press; release is swallowed.
    LongPressed,
    /// First release seen, waiting to see if a second press follows.
    PendingDoubleClick { since_ms: u32 },
}

pub struct ButtonClassifier {
    timing: ButtonTiming,
    /// Debounced contact level (true = pressed).
    stable: bool,
    /// Most recent raw sample and when it last changed.
    raw: bool,
    raw_since_ms: u32,
    state: PressState,
}

impl ButtonClassifier {
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            stable: false,
            raw: false,
            raw_since_ms: 0,
            state: PressState::Idle,
        }
    }

    /// Whether the debounced contact is currently closed.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample.  Call once per control tick per button.
    /// `now_ms` is monotonic milliseconds.  Returns at most one event.
    pub fn update(&mut self, raw_active: bool, now_ms: u32) -> Option<ButtonEvent> {
        let edge = self.debounce(raw_active, now_ms);
        self.step(edge, now_ms)
    }

    /// A changed raw level must persist for the debounce window before it
    /// commits as a real transition.
    fn debounce(&mut self, raw_active: bool, now_ms: u32) -> Option<Edge> {
        if raw_active != self.raw {
            self.raw = raw_active;
            self.raw_since_ms = now_ms;
        }

        if self.raw != self.stable && now_ms.wrapping_sub(self.raw_since_ms) >= self.timing.debounce_ms
        {
            self.stable = self.raw;
            return Some(if self.stable { Edge::Press } else { Edge::Release });
        }
        None
    }

    fn step(&mut self, edge: Option<Edge>, now_ms: u32) -> Option<ButtonEvent> {
        match self.state {
            PressState::Idle => {
                if edge == Some(Edge::Press) {
                    self.state = PressState::Pressed {
                        since_ms: now_ms,
                        is_second: false,
                    };
                }
                None
            }

            PressState::Pressed { since_ms, is_second } => {
                // Long press wins over everything else for this press.
                if now_ms.wrapping_sub(since_ms) >= self.timing.long_press_ms {
                    self.state = PressState::LongPressed;
                    return Some(ButtonEvent::Long);
                }

                if edge == Some(Edge::Release) {
                    if is_second {
                        self.state = PressState::Idle;
                        return Some(ButtonEvent::Double);
                    }
                    self.state = PressState::PendingDoubleClick { since_ms: now_ms };
                }
                None
            }

            PressState::LongPressed => {
                if edge == Some(Edge::Release) {
                    self.state = PressState::Idle;
                }
                None
            }

            PressState::PendingDoubleClick { since_ms } => {
                // Expiry check runs first so a late press starts a fresh
                // cycle instead of completing a stale double click.
                if now_ms.wrapping_sub(since_ms) > self.timing.double_click_ms {
                    self.state = if edge == Some(Edge::Press) {
                        PressState::Pressed {
                            since_ms: now_ms,
                            is_second: false,
                        }
                    } else {
                        PressState::Idle
                    };
                    return Some(ButtonEvent::Single);
                }

                if edge == Some(Edge::Press) {
                    self.state = PressState::Pressed {
                        since_ms: now_ms,
                        is_second: true,
                    };
                }
                None
            }
        }
    }
}

/// Active-low level reader over any `embedded-hal` input pin.
///
/// Pin must already be configured as a pull-up input.
pub struct ButtonInput<P> {
    pin: P,
}

impl<P> ButtonInput<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Raw contact state: true = pressed (level low).
    pub fn is_active(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ButtonClassifier {
        ButtonClassifier::new(ButtonTiming::default())
    }

    /// Drive a debounced press edge at `t`: raw goes active at `t`, the
    /// edge commits at `t + debounce`.
    fn press(b: &mut ButtonClassifier, t: u32) -> Option<ButtonEvent> {
        assert_eq!(b.update(true, t), None);
        b.update(true, t + 50)
    }

    fn release(b: &mut ButtonClassifier, t: u32) -> Option<ButtonEvent> {
        assert_eq!(b.update(false, t), None);
        b.update(false, t + 50)
    }

    #[test]
    fn no_events_without_press() {
        let mut b = classifier();
        assert_eq!(b.update(false, 100), None);
        assert_eq!(b.update(false, 200), None);
    }

    #[test]
    fn debounce_filters_contact_noise() {
        let mut b = classifier();
        // Bounces faster than the debounce window never commit.
        assert_eq!(b.update(true, 0), None);
        assert_eq!(b.update(false, 20), None);
        assert_eq!(b.update(true, 40), None);
        assert_eq!(b.update(false, 60), None);
        assert!(!b.is_pressed());
    }

    #[test]
    fn single_click_after_window_expiry() {
        let mut b = classifier();
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(release(&mut b, 200), None);
        // Inside the double-click window: still nothing.
        assert_eq!(b.update(false, 600), None);
        // Window (500 ms from the release commit at t=250) expires.
        assert_eq!(b.update(false, 800), Some(ButtonEvent::Single));
        // And only once.
        assert_eq!(b.update(false, 900), None);
    }

    #[test]
    fn double_click_on_second_release() {
        let mut b = classifier();
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(release(&mut b, 100), None);
        assert_eq!(press(&mut b, 250), None);
        assert_eq!(release(&mut b, 350), Some(ButtonEvent::Double));
    }

    #[test]
    fn two_releases_within_window_yield_exactly_one_double() {
        let mut b = classifier();
        let mut events = Vec::new();
        // Press/release, press/release with releases 250 ms apart.
        for (raw, t) in [
            (true, 0u32),
            (true, 50),
            (false, 100),
            (false, 150),
            (true, 200),
            (true, 250),
            (false, 350),
            (false, 400),
        ] {
            if let Some(e) = b.update(raw, t) {
                events.push(e);
            }
        }
        // Let any pending wait expire.
        for t in (500..2000).step_by(50) {
            if let Some(e) = b.update(false, t) {
                events.push(e);
            }
        }
        assert_eq!(events, vec![ButtonEvent::Double]);
    }

    #[test]
    fn long_press_fires_while_held() {
        let mut b = classifier();
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(b.update(true, 500), None);
        assert_eq!(b.update(true, 1100), Some(ButtonEvent::Long));
    }

    #[test]
    fn long_press_release_emits_nothing() {
        let mut b = classifier();
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(b.update(true, 1100), Some(ButtonEvent::Long));
        assert_eq!(release(&mut b, 1500), None);
        // No stale Single later either.
        for t in (1600..3000).step_by(50) {
            assert_eq!(b.update(false, t), None);
        }
    }

    #[test]
    fn long_press_cancels_pending_double() {
        let mut b = classifier();
        // First click...
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(release(&mut b, 100), None);
        // ...second press held past the long threshold.
        assert_eq!(press(&mut b, 250), None);
        assert_eq!(b.update(true, 1400), Some(ButtonEvent::Long));
        assert_eq!(release(&mut b, 1600), None);
        for t in (1700..3000).step_by(50) {
            assert_eq!(b.update(false, t), None);
        }
    }

    #[test]
    fn late_second_press_starts_fresh_cycle() {
        let mut b = classifier();
        assert_eq!(press(&mut b, 0), None);
        assert_eq!(release(&mut b, 100), None);
        // Raw press arrives long after the window; the stale wait resolves
        // to Single and the new press counts as a first press.
        assert_eq!(b.update(true, 900), Some(ButtonEvent::Single));
        assert_eq!(b.update(true, 950), None);
        assert_eq!(release(&mut b, 1050), None);
        // That press eventually resolves to its own Single.
        assert_eq!(b.update(false, 1700), Some(ButtonEvent::Single));
    }
}
