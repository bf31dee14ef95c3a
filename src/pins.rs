//! GPIO assignments for the pins driven through raw LEDC calls
//! (ESP32-WROOM keypad board).
//!
//! The keypad matrix and the Nokia 5110 are owned by `esp-idf-hal` drivers,
//! so `main.rs` takes those pins straight from `Peripherals`:
//!
//! | function        | GPIO                  |
//! |-----------------|-----------------------|
//! | keypad rows 1-4 | 13, 12, 14, 27        |
//! | keypad cols 1-3 | 26, 25, 33 (pull-up)  |
//! | LCD CLK / DIN   | 18 / 23 (SPI2)        |
//! | LCD CE          | 17                    |
//! | LCD DC / RST    | 2 / 16                |

/// Backlight LED, PWM dimmed.
pub const LCD_BL_GPIO: i32 = 22;
/// PCD8544 tolerates up to 4 MHz.
pub const LCD_SPI_FREQ_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// Status LEDs (discrete, PWM dimmed)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 32;
pub const LED_ORANGE_GPIO: i32 = 4;
pub const LED_GREEN_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Piezo buzzer
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC frequency for the LEDs and the backlight (8-bit duty).
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
/// Initial buzzer timer frequency; retuned per note.
pub const BUZZER_BASE_FREQ_HZ: u32 = 1_000;
/// Half of the buzzer timer's 10-bit range: a square wave.
pub const BUZZER_DUTY: u32 = 512;
