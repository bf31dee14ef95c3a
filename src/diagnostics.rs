//! Build stamp and runtime diagnostics.
//!
//! Backs the plaintext status page served on `GET /` and the info screen
//! shown by command 77.  Runtime metrics (heap, RSSI) are collected
//! on demand and only logged.

use core::fmt::Write;

use crate::uptime::format_uptime;

/// Build date, `"Mon DD YYYY"`, stamped by `build.rs`.
pub const BUILD_DATE: &str = env!("BUILD_DATE");
/// Build time, `"HH:MM:SS"` UTC, stamped by `build.rs`.
pub const BUILD_TIME: &str = env!("BUILD_TIME");

/// Body of the diagnostic HTTP endpoint.
pub fn status_page(uptime_ms: u64) -> String {
    let mut body = String::from("Keypad is online!\n\n");
    // Writing into a String cannot fail.
    let _ = write!(
        body,
        "Build Date: {BUILD_DATE}\nBuild Time: {BUILD_TIME}\n\nUptime: {}",
        format_uptime(uptime_ms)
    );
    body
}

/// Everything the info screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoScreen {
    /// Station IP, or `None` while offline.
    pub ip: Option<String>,
    pub build_date: &'static str,
    pub build_time: &'static str,
    pub uptime: String,
}

impl InfoScreen {
    pub fn capture(ip: Option<String>, uptime_ms: u64) -> Self {
        Self {
            ip,
            build_date: BUILD_DATE,
            build_time: BUILD_TIME,
            uptime: format_uptime(uptime_ms),
        }
    }

    /// Text lines, top to bottom.
    pub fn lines(&self) -> [String; 6] {
        [
            "IP address:".to_owned(),
            self.ip.clone().unwrap_or_else(|| "offline".to_owned()),
            "Build Date:".to_owned(),
            self.build_date.to_owned(),
            self.build_time.to_owned(),
            self.uptime.clone(),
        ]
    }
}

// ───────────────────────────────────────────────────────────────
// Runtime metrics
// ───────────────────────────────────────────────────────────────

/// Snapshot of runtime health, logged alongside the info screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeMetrics {
    pub uptime_secs: u64,
    pub heap_free: u32,
    pub heap_min_free: u32,
    /// dBm; `0` when not associated.
    pub wifi_rssi: i8,
    pub commands_accepted: u32,
    pub commands_rejected: u32,
}

impl RuntimeMetrics {
    /// `wifi_rssi` comes from the connectivity port; `None` reads as `0`.
    pub fn collect(
        uptime_secs: u64,
        wifi_rssi: Option<i8>,
        commands_accepted: u32,
        commands_rejected: u32,
    ) -> Self {
        let (heap_free, heap_min_free) = heap_stats();
        Self {
            uptime_secs,
            heap_free,
            heap_min_free,
            wifi_rssi: wifi_rssi.unwrap_or(0),
            commands_accepted,
            commands_rejected,
        }
    }
}

#[cfg(target_os = "espidf")]
fn heap_stats() -> (u32, u32) {
    use esp_idf_svc::sys::{esp_get_free_heap_size, esp_get_minimum_free_heap_size};
    // SAFETY: heap statistics are read-only queries with no preconditions.
    unsafe { (esp_get_free_heap_size(), esp_get_minimum_free_heap_size()) }
}

/// Simulation: a plausible ESP32 heap.
#[cfg(not(target_os = "espidf"))]
fn heap_stats() -> (u32, u32) {
    (240 * 1024, 200 * 1024)
}

impl core::fmt::Display for RuntimeMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "up={}s heap={}/{}B rssi={}dBm cmds ok={} rejected={}",
            self.uptime_secs,
            self.heap_free,
            self.heap_min_free,
            self.wifi_rssi,
            self.commands_accepted,
            self.commands_rejected,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_page_layout() {
        let page = status_page(59_000);
        assert!(page.starts_with("Keypad is online!\n\nBuild Date: "));
        assert!(page.contains("\nBuild Time: "));
        assert!(page.ends_with("\n\nUptime: 59 seconds"));
    }

    #[test]
    fn build_stamp_shapes() {
        assert_eq!(BUILD_TIME.len(), 8);
        assert_eq!(BUILD_TIME.matches(':').count(), 2);
        assert_eq!(BUILD_DATE.len(), 11);
        let months = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        assert!(months.contains(&&BUILD_DATE[..3]));
        assert!(BUILD_DATE[7..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn info_screen_offline() {
        let info = InfoScreen::capture(None, 61_000);
        let lines = info.lines();
        assert_eq!(lines[1], "offline");
        assert_eq!(lines[5], "1 minute, 1 second");
    }

    #[test]
    fn metrics_display() {
        let m = RuntimeMetrics::collect(10, Some(-67), 3, 1);
        let s = m.to_string();
        assert!(s.contains("up=10s"));
        assert!(s.contains("rssi=-67dBm"));
        assert!(s.contains("ok=3 rejected=1"));
    }

    #[test]
    fn metrics_offline_rssi_is_zero() {
        assert_eq!(RuntimeMetrics::collect(0, None, 0, 0).wifi_rssi, 0);
    }
}
