//! GPIO / peripheral pin assignments for the Growlight main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Lamp channels (LEDC PWM, one channel per colour band)
// ---------------------------------------------------------------------------

/// White band PWM output.
pub const WHITE_PWM_GPIO: i32 = 1;
/// Red band PWM output.
pub const RED_PWM_GPIO: i32 = 2;
/// UV band PWM output.
pub const UV_PWM_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// User buttons (active-low momentary switches with internal pull-ups)
// ---------------------------------------------------------------------------

/// Top button — "increment" in the menu navigator.
pub const BUTTON_INC_GPIO: i32 = 14;
/// Bottom button — "decrement" in the menu navigator.
pub const BUTTON_DEC_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// LEDC configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for all lamp channels (5 kHz — flicker-free).
/// The timer runs at 8-bit resolution, matching the 0-255 brightness
/// domain used throughout the control core.
pub const LAMP_PWM_FREQ_HZ: u32 = 5_000;

/// LEDC channel indices.
pub const LEDC_CH_WHITE: u32 = 0;
pub const LEDC_CH_RED: u32 = 1;
pub const LEDC_CH_UV: u32 = 2;
