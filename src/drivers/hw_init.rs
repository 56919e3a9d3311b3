//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer and the three lamp PWM channels using raw
//! ESP-IDF sys calls.  Called once from `main()` before the control loop
//! starts; button GPIOs are owned by `esp-idf-hal` pin drivers and set up
//! in `main()` directly.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::{ActuatorError, Error};
use crate::pins;

/// Configure the LEDC timer and lamp channels, all at duty 0.
#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), Error> {
    // SAFETY: Called once from main() before the control loop;
    // single-threaded.
    unsafe {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: ledc_timer_t_LEDC_TIMER_0,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
            freq_hz: pins::LAMP_PWM_FREQ_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        if ledc_timer_config(&timer) != ESP_OK {
            return Err(Error::Init("LEDC timer config failed"));
        }

        let lamp_channels = [
            (pins::LEDC_CH_WHITE, pins::WHITE_PWM_GPIO),
            (pins::LEDC_CH_RED, pins::RED_PWM_GPIO),
            (pins::LEDC_CH_UV, pins::UV_PWM_GPIO),
        ];
        for (channel, gpio) in lamp_channels {
            let cfg = ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            };
            if ledc_channel_config(&cfg) != ESP_OK {
                return Err(Error::Init("LEDC channel config failed"));
            }
        }
    }
    info!("hw_init: LEDC configured (white=CH0, red=CH1, uv=CH2 @ 5kHz)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), Error> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

/// Write a duty value to an LEDC channel.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> Result<(), ActuatorError> {
    // SAFETY: LEDC channels were configured in init_peripherals(); duty
    // register writes are race-free since only the main loop calls this.
    unsafe {
        if ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32) != ESP_OK {
            return Err(ActuatorError::PwmWriteFailed);
        }
        if ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) != ESP_OK {
            return Err(ActuatorError::PwmWriteFailed);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) -> Result<(), ActuatorError> {
    Ok(())
}
