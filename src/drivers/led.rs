//! Single PWM-dimmed LED with steady and flashing output.
//!
//! The main loop calls [`PwmLed::tick`] every cycle; the LED toggles itself
//! while flashing.  Output goes straight to an LEDC channel via
//! [`hw_init::ledc_set`]; on host the duty is tracked in memory only.

use crate::drivers::hw_init;

/// Lowest and highest duty the 1–10 brightness scale maps to.
pub const MIN_DUTY: u8 = 25;
pub const MAX_DUTY: u8 = 255;

/// Map a brightness level 1–10 onto 25–255 (levels outside are clamped).
pub fn brightness_to_duty(level: u8) -> u8 {
    let level = u32::from(level.clamp(1, 10));
    let span = u32::from(MAX_DUTY - MIN_DUTY);
    // Linear, integer: level 1 -> 25, level 10 -> 255.
    let duty = u32::from(MIN_DUTY) + (level - 1) * span / 9;
    u8::try_from(duty).unwrap_or(MAX_DUTY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    Steady,
    Flashing,
}

#[derive(Debug)]
pub struct PwmLed {
    channel: u32,
    duty: u8,
    mode: LedMode,
    lit: bool,
    flash_interval_ms: u32,
    last_toggle_ms: u64,
}

impl PwmLed {
    pub fn new(channel: u32, flash_interval_ms: u32) -> Self {
        Self {
            channel,
            duty: MAX_DUTY,
            mode: LedMode::Off,
            lit: false,
            flash_interval_ms,
            last_toggle_ms: 0,
        }
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.duty = brightness_to_duty(level);
        if self.lit {
            self.write(true);
        }
    }

    pub fn on(&mut self) {
        self.mode = LedMode::Steady;
        self.write(true);
    }

    /// Start flashing, beginning dark.
    pub fn flash(&mut self, now_ms: u64) {
        self.mode = LedMode::Flashing;
        self.last_toggle_ms = now_ms;
        self.write(false);
    }

    pub fn off(&mut self) {
        self.mode = LedMode::Off;
        self.write(false);
    }

    pub fn tick(&mut self, now_ms: u64) {
        if self.mode == LedMode::Flashing
            && now_ms.saturating_sub(self.last_toggle_ms) >= u64::from(self.flash_interval_ms)
        {
            self.last_toggle_ms = now_ms;
            self.write(!self.lit);
        }
    }

    pub fn mode(&self) -> LedMode {
        self.mode
    }

    /// Whether the LED is emitting light right now.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Duty currently on the pin.
    pub fn output(&self) -> u8 {
        if self.lit { self.duty } else { 0 }
    }

    fn write(&mut self, lit: bool) {
        self.lit = lit;
        hw_init::ledc_set(self.channel, self.output());
    }
}
