//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the two button inputs and the three LEDC lamp channels, exposing
//! them through [`InputPort`] and [`PwmPort`].  This is the only module in
//! the system that touches actual output hardware.  On non-espidf targets
//! the LEDC helpers in `drivers::hw_init` are simulation stubs, and any
//! `embedded-hal` input pin (e.g. a test double) can stand in for the real
//! GPIOs.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::{ButtonLevels, InputPort, PwmPort};
use crate::control::channel::ChannelId;
use crate::drivers::button::ButtonInput;
use crate::drivers::hw_init;
use crate::pins;

/// Concrete adapter that combines lamp PWM and button GPIOs behind the
/// port traits.  Generic over the pin types so host tests can inject
/// fake pins.
pub struct HardwareAdapter<I, D> {
    btn_inc: ButtonInput<I>,
    btn_dec: ButtonInput<D>,
}

impl<I, D> HardwareAdapter<I, D>
where
    I: InputPin,
    D: InputPin,
{
    /// Pins must already be configured as pull-up inputs.
    pub fn new(increment_pin: I, decrement_pin: D) -> Self {
        Self {
            btn_inc: ButtonInput::new(increment_pin),
            btn_dec: ButtonInput::new(decrement_pin),
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<I, D> InputPort for HardwareAdapter<I, D>
where
    I: InputPin,
    D: InputPin,
{
    fn read_buttons(&mut self) -> ButtonLevels {
        ButtonLevels {
            increment: self.btn_inc.is_active(),
            decrement: self.btn_dec.is_active(),
        }
    }
}

// ── PwmPort implementation ────────────────────────────────────

impl<I, D> PwmPort for HardwareAdapter<I, D>
where
    I: InputPin,
    D: InputPin,
{
    fn set_level(&mut self, channel: ChannelId, level: u8) {
        let ledc_channel = match channel {
            ChannelId::White => pins::LEDC_CH_WHITE,
            ChannelId::Red => pins::LEDC_CH_RED,
            ChannelId::Uv => pins::LEDC_CH_UV,
        };
        if let Err(e) = hw_init::ledc_set(ledc_channel, level) {
            // A failed duty write is not fatal; the next fade step retries.
            warn!("lamp {:?}: {}", channel, e);
        }
    }
}
