//! One-shot hardware peripheral initialization and raw PWM access.
//!
//! Configures the LEDC timers and channels for the buzzer, the status LEDs
//! and the display backlight using raw ESP-IDF sys calls.  Called once from
//! `main()` before the control loop starts.  The keypad and display pins are
//! owned by `esp-idf-hal` drivers and are not touched here.
//!
//! | LEDC channel | timer         | pin                    |
//! |--------------|---------------|------------------------|
//! | CH0          | T0 (10-bit)   | buzzer (freq per note) |
//! | CH1          | T1 (8-bit)    | LCD backlight          |
//! | CH2          | T1            | red LED                |
//! | CH3          | T1            | orange LED             |
//! | CH4          | T1            | green LED              |
//!
//! The buzzer timer runs at 10 bits so the clock divider still fits for
//! the lowest note (110 Hz); at 8 bits anything under ~305 Hz is refused.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{info, warn};

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
    GpioConfigFailed(i32),
    SpiInitFailed(i32),
    DisplayInitFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={rc})"),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::SpiInitFailed(rc) => write!(f, "SPI bus init failed (rc={rc})"),
            Self::DisplayInitFailed => write!(f, "display did not accept init sequence"),
        }
    }
}

pub const LEDC_CH_BUZZER: u32 = 0;
pub const LEDC_CH_BACKLIGHT: u32 = 1;
pub const LEDC_CH_LED_RED: u32 = 2;
pub const LEDC_CH_LED_ORANGE: u32 = 3;
pub const LEDC_CH_LED_GREEN: u32 = 4;

/// Duty resolution of the buzzer timer.
pub const BUZZER_RESOLUTION_BITS: u32 = 10;
/// Duty resolution of the LED and backlight timer.
pub const LED_RESOLUTION_BITS: u32 = 8;

/// LEDC source clock picked by `LEDC_AUTO_CLK` (APB).
const LEDC_SRC_CLK_HZ: u64 = 80_000_000;
/// Clock divider is 10 integer bits plus 8 fractional bits.
const LEDC_DIV_MAX_Q8: u64 = (1 << 18) - 1;
const LEDC_DIV_MIN_Q8: u64 = 1 << 8;

/// Whether the LEDC divider can produce `freq_hz` at `resolution_bits`.
pub fn ledc_freq_reachable(freq_hz: u32, resolution_bits: u32) -> bool {
    if freq_hz == 0 {
        return false;
    }
    let div_q8 = (LEDC_SRC_CLK_HZ << 8) / (u64::from(freq_hz) << resolution_bits);
    (LEDC_DIV_MIN_Q8..=LEDC_DIV_MAX_Q8).contains(&div_q8)
}

#[cfg(target_os = "espidf")]
const LEDC_TIMER_BUZZER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;
#[cfg(target_os = "espidf")]
const LEDC_TIMER_LEDS: ledc_timer_t = ledc_timer_t_LEDC_TIMER_1;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe { init_ledc()? };
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    for (timer_num, freq_hz, duty_resolution) in [
        (
            LEDC_TIMER_BUZZER,
            pins::BUZZER_BASE_FREQ_HZ,
            ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        ),
        (
            LEDC_TIMER_LEDS,
            pins::LED_PWM_FREQ_HZ,
            ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        ),
    ] {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&timer) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcTimerFailed(ret));
        }
    }

    let channels = [
        (LEDC_CH_BUZZER, LEDC_TIMER_BUZZER, pins::BUZZER_GPIO),
        (LEDC_CH_BACKLIGHT, LEDC_TIMER_LEDS, pins::LCD_BL_GPIO),
        (LEDC_CH_LED_RED, LEDC_TIMER_LEDS, pins::LED_RED_GPIO),
        (LEDC_CH_LED_ORANGE, LEDC_TIMER_LEDS, pins::LED_ORANGE_GPIO),
        (LEDC_CH_LED_GREEN, LEDC_TIMER_LEDS, pins::LED_GREEN_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel,
                gpio_num,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcChannelFailed(ret));
        }
    }

    info!("hw_init: LEDC configured (buzzer=CH0, backlight=CH1, leds=CH2-4)");
    Ok(())
}

/// 8-bit duty for the LED timer channels.
pub fn ledc_set(channel: u32, duty: u8) {
    set_duty(channel, u32::from(duty));
}

#[cfg(target_os = "espidf")]
fn set_duty(channel: u32, duty: u32) {
    // SAFETY: channels were configured in init_ledc(); only the main loop
    // writes duty registers.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
fn set_duty(_channel: u32, _duty: u32) {}

/// Retune the buzzer timer and start a square wave.
///
/// A refused retune leaves the buzzer silent rather than on the old pitch.
#[cfg(target_os = "espidf")]
pub fn buzzer_tone(freq_hz: u16) {
    // SAFETY: the buzzer timer is private to CH0; main loop only.
    let ret = unsafe {
        ledc_set_freq(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            LEDC_TIMER_BUZZER,
            u32::from(freq_hz),
        )
    };
    if ret != ESP_OK as i32 {
        warn!("hw_init: buzzer cannot play {} Hz (rc={})", freq_hz, ret);
        buzzer_silence();
        return;
    }
    set_duty(LEDC_CH_BUZZER, pins::BUZZER_DUTY);
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_tone(freq_hz: u16) {
    if !ledc_freq_reachable(u32::from(freq_hz), BUZZER_RESOLUTION_BITS) {
        log::warn!("hw_init(sim): buzzer cannot play {} Hz", freq_hz);
    }
}

pub fn buzzer_silence() {
    set_duty(LEDC_CH_BUZZER, 0);
}

/// Block the calling task.
#[cfg(target_os = "espidf")]
pub fn delay_ms(ms: u32) {
    esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
}

/// Simulation: time does not pass.
#[cfg(not(target_os = "espidf"))]
pub fn delay_ms(_ms: u32) {}

/// Reboot the chip.  Does not return on hardware.
#[cfg(target_os = "espidf")]
pub fn restart() {
    info!("hw_init: restarting");
    // SAFETY: esp_restart has no preconditions.
    unsafe { esp_restart() };
}

#[cfg(not(target_os = "espidf"))]
pub fn restart() {
    log::warn!("hw_init(sim): restart requested, ignoring");
}
