//! Device identity derived from the ESP32 factory MAC address.
//!
//! The hostname is `<prefix>-xxyyzz`, the last 3 bytes of the 6-byte MAC in
//! lowercase hex.  It is stable across reboots (eFuse MAC) and is what the
//! router and the bridge see.

use core::fmt::Write;

/// Hostname buffer; the prefix is capped at 16 bytes by config.
pub type Hostname = heapless::String<24>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` has the 6 bytes the call writes.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// `<prefix>-xxyyzz`.
pub fn hostname(prefix: &str, mac: &MacAddress) -> Hostname {
    let mut name = Hostname::new();
    // 16-byte prefix + 7 bytes of suffix fit the buffer.
    let _ = write!(name, "{}-{:02x}{:02x}{:02x}", prefix, mac[3], mac[4], mac[5]);
    name
}
