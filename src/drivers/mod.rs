//! Peripheral drivers: LEDs, backlight, buzzer, keypad matrix and display.

pub mod backlight;
pub mod buzzer;
pub mod display;
pub mod hw_init;
pub mod keypad;
pub mod led;
pub mod pcd8544;
pub mod status_leds;
