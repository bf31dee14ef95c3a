//! Device configuration parameters
//!
//! All tunable parameters for the keypad.  Stored as a postcard blob in NVS
//! and validated before every save.  Wi-Fi credentials are not part of it;
//! they are baked in at build time.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypadConfig {
    // --- Identity ---
    /// Hostname prefix; the MAC suffix is appended at boot
    pub device_name_prefix: heapless::String<16>,

    // --- Backlight ---
    /// Idle time before the display backlight switches off (milliseconds)
    pub backlight_timeout_ms: u32,
    /// Backlight brightness level (1-10)
    pub backlight_brightness: u8,

    // --- Status LEDs ---
    /// LED brightness level (1-10)
    pub led_brightness: u8,
    /// Half-period of the acknowledged-state flash (milliseconds)
    pub led_flash_interval_ms: u32,

    // --- Display ---
    /// LCD contrast (0-127)
    pub display_contrast: u8,
    /// How long the info screen stays up (milliseconds)
    pub info_screen_ms: u32,

    // --- Network ---
    /// Connection attempts before giving up at boot
    pub wifi_max_attempts: u16,
    /// Delay between connection attempts (milliseconds)
    pub wifi_retry_interval_ms: u32,
    /// Diagnostic HTTP server port
    pub http_port: u16,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub loop_interval_ms: u32,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        let mut device_name_prefix = heapless::String::new();
        // "keypad" fits the 16-byte capacity.
        let _ = device_name_prefix.push_str("keypad");

        Self {
            device_name_prefix,

            // Backlight
            backlight_timeout_ms: 60_000, // 1 min
            backlight_brightness: 8,

            // Status LEDs
            led_brightness: 7,
            led_flash_interval_ms: 500, // 1 Hz blink

            // Display
            display_contrast: 60,
            info_screen_ms: 5_000,

            // Network
            wifi_max_attempts: 20,
            wifi_retry_interval_ms: 500, // ~10 s total
            http_port: 80,

            // Timing
            loop_interval_ms: 10, // 100 Hz keypad scan
        }
    }
}

impl KeypadConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_name_prefix.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "device_name_prefix must not be empty",
            ));
        }
        if !(1_000..=3_600_000).contains(&self.backlight_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "backlight_timeout_ms must be 1000-3600000",
            ));
        }
        if !(1..=10).contains(&self.backlight_brightness) {
            return Err(ConfigError::ValidationFailed(
                "backlight_brightness must be 1-10",
            ));
        }
        if !(1..=10).contains(&self.led_brightness) {
            return Err(ConfigError::ValidationFailed("led_brightness must be 1-10"));
        }
        if !(50..=5_000).contains(&self.led_flash_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "led_flash_interval_ms must be 50-5000",
            ));
        }
        if self.display_contrast > 127 {
            return Err(ConfigError::ValidationFailed(
                "display_contrast must be 0-127",
            ));
        }
        if self.wifi_max_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "wifi_max_attempts must be at least 1",
            ));
        }
        if !(100..=60_000).contains(&self.wifi_retry_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "wifi_retry_interval_ms must be 100-60000",
            ));
        }
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be non-zero"));
        }
        if !(1..=1_000).contains(&self.loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "loop_interval_ms must be 1-1000",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(KeypadConfig::default().validate(), Ok(()));
    }

    #[test]
    fn defaults_match_hardware() {
        let c = KeypadConfig::default();
        assert_eq!(c.device_name_prefix.as_str(), "keypad");
        assert_eq!(c.backlight_timeout_ms, 60_000);
        assert_eq!(c.led_flash_interval_ms, 500);
        assert_eq!(c.display_contrast, 60);
    }

    #[test]
    fn rejects_brightness_out_of_range() {
        let c = KeypadConfig {
            led_brightness: 11,
            ..KeypadConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));

        let c = KeypadConfig {
            backlight_brightness: 0,
            ..KeypadConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_wifi_attempts() {
        let c = KeypadConfig {
            wifi_max_attempts: 0,
            ..KeypadConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn postcard_roundtrip() {
        let c = KeypadConfig {
            led_brightness: 3,
            ..KeypadConfig::default()
        };
        let bytes = postcard::to_allocvec(&c).unwrap();
        let back: KeypadConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn retry_budget_is_bounded() {
        let c = KeypadConfig::default();
        let total_ms = u32::from(c.wifi_max_attempts) * c.wifi_retry_interval_ms;
        assert!(total_ms <= 60_000, "boot must not stall for over a minute");
    }
}
