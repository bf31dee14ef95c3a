//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] as a bounded-retry connection machine:
//!
//! ```text
//!  Disconnected ──connect()──▶ Connecting{1} ──link up──▶ Connected
//!                                   │   ▲                    │
//!                      retry interval   │             link lost
//!                                   ▼   │                    │
//!                              Connecting{n+1} ◀─────────────┘ (fresh budget)
//!                                   │
//!                          n == max_attempts
//!                                   ▼
//!                                Failed  (terminal until connect())
//! ```
//!
//! The machine never blocks; [`ConnectivityPort::poll`] advances it with
//! the caller's clock.  The radio itself sits behind [`WifiLink`]:
//!
//! - **`target_os = "espidf"`**: [`EspWifiLink`] over `esp_idf_svc::wifi::EspWifi`.
//! - **all other targets**: [`SimLink`], deterministic, for host-side tests.

use core::fmt;
use log::{info, warn};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// The radio refused to start an association attempt.
    AssociationFailed,
    /// Every attempt in the retry budget was used.
    Exhausted { attempts: u16 },
    /// Raw ESP-IDF error code.
    Driver(i32),
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::AssociationFailed => write!(f, "association attempt failed"),
            Self::Exhausted { attempts } => write!(f, "gave up after {attempts} attempts"),
            Self::Driver(code) => write!(f, "WiFi driver error {code}"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

/// Network connectivity as seen by the control loop.
pub trait ConnectivityPort {
    /// Start (or restart) a connection with a fresh retry budget.
    fn connect(&mut self, now_ms: u64) -> Result<(), ConnectivityError>;
    /// Advance the connection machine; returns the resulting state.
    fn poll(&mut self, now_ms: u64) -> WifiState;
    fn state(&self) -> WifiState;
    /// Station IPv4 address while connected.
    fn ip_address(&self) -> Option<String>;
    /// Signal strength of the current association, dBm.
    fn rssi(&self) -> Option<i8>;
}

/// The radio below the connection machine.
pub trait WifiLink {
    fn configure(&mut self, ssid: &str, password: &str, hostname: &str)
    -> Result<(), ConnectivityError>;
    /// Kick off one association attempt.  Must not block.
    fn associate(&mut self) -> Result<(), ConnectivityError>;
    /// Associated and holding an IP address.
    fn is_up(&self) -> bool;
    fn ip_address(&self) -> Option<String>;
    fn rssi(&self) -> Option<i8>;
    fn drop_link(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    /// `attempt` counts from 1.
    Connecting { attempt: u16 },
    Connected,
    Failed,
}

/// How hard to try before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u16,
    pub retry_interval_ms: u32,
}

impl RetryPolicy {
    pub fn from_config(cfg: &crate::config::KeypadConfig) -> Self {
        Self {
            max_attempts: cfg.wifi_max_attempts.max(1),
            retry_interval_ms: cfg.wifi_retry_interval_ms,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter<L: WifiLink> {
    link: L,
    state: WifiState,
    policy: RetryPolicy,
    configured: bool,
    last_attempt_ms: u64,
}

impl<L: WifiLink> WifiAdapter<L> {
    pub fn new(link: L, policy: RetryPolicy) -> Self {
        Self {
            link,
            state: WifiState::Disconnected,
            policy,
            configured: false,
            last_attempt_ms: 0,
        }
    }

    /// Validate and hand credentials plus hostname to the radio.
    pub fn set_credentials(
        &mut self,
        ssid: &str,
        password: &str,
        hostname: &str,
    ) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.link.configure(ssid, password, hostname)?;
        self.configured = true;
        info!("WiFi: credentials set (SSID='{}', host='{}')", ssid, hostname);
        Ok(())
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    fn attempt(&mut self, attempt: u16, now_ms: u64) {
        self.state = WifiState::Connecting { attempt };
        self.last_attempt_ms = now_ms;
        info!("WiFi: attempt {}/{}", attempt, self.policy.max_attempts);
        if let Err(e) = self.link.associate() {
            warn!("WiFi: attempt {} failed to start: {}", attempt, e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl<L: WifiLink> ConnectivityPort for WifiAdapter<L> {
    fn connect(&mut self, now_ms: u64) -> Result<(), ConnectivityError> {
        if !self.configured {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Ok(());
        }
        self.attempt(1, now_ms);
        Ok(())
    }

    fn poll(&mut self, now_ms: u64) -> WifiState {
        match self.state {
            WifiState::Connecting { attempt } => {
                if self.link.is_up() {
                    self.state = WifiState::Connected;
                    info!(
                        "WiFi: connected after {} attempt(s), ip={:?}",
                        attempt,
                        self.link.ip_address()
                    );
                } else if now_ms.saturating_sub(self.last_attempt_ms)
                    >= u64::from(self.policy.retry_interval_ms)
                {
                    if attempt >= self.policy.max_attempts {
                        warn!(
                            "WiFi: {}",
                            ConnectivityError::Exhausted { attempts: attempt }
                        );
                        self.link.drop_link();
                        self.state = WifiState::Failed;
                    } else {
                        self.attempt(attempt + 1, now_ms);
                    }
                }
            }
            WifiState::Connected => {
                if !self.link.is_up() {
                    warn!("WiFi: connection lost, retrying");
                    self.attempt(1, now_ms);
                }
            }
            WifiState::Disconnected | WifiState::Failed => {}
        }
        self.state
    }

    fn state(&self) -> WifiState {
        self.state
    }

    fn ip_address(&self) -> Option<String> {
        if self.state == WifiState::Connected {
            self.link.ip_address()
        } else {
            None
        }
    }

    fn rssi(&self) -> Option<i8> {
        if self.state == WifiState::Connected {
            self.link.rssi()
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF radio
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspWifiLink;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

    use super::{ConnectivityError, WifiLink};

    pub struct EspWifiLink {
        wifi: EspWifi<'static>,
    }

    impl EspWifiLink {
        pub fn new(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<EspDefaultNvsPartition>,
        ) -> Result<Self, ConnectivityError> {
            let wifi = EspWifi::new(modem, sysloop, nvs)
                .map_err(|e| ConnectivityError::Driver(e.code()))?;
            Ok(Self { wifi })
        }
    }

    impl WifiLink for EspWifiLink {
        fn configure(
            &mut self,
            ssid: &str,
            password: &str,
            hostname: &str,
        ) -> Result<(), ConnectivityError> {
            let auth_method = if password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            let conf = Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
                password: password
                    .try_into()
                    .map_err(|_| ConnectivityError::InvalidPassword)?,
                auth_method,
                ..Default::default()
            });
            self.wifi
                .set_configuration(&conf)
                .map_err(|e| ConnectivityError::Driver(e.code()))?;
            self.wifi
                .sta_netif_mut()
                .set_hostname(hostname)
                .map_err(|e| ConnectivityError::Driver(e.code()))?;
            self.wifi
                .start()
                .map_err(|e| ConnectivityError::Driver(e.code()))
        }

        fn associate(&mut self) -> Result<(), ConnectivityError> {
            self.wifi
                .connect()
                .map_err(|_| ConnectivityError::AssociationFailed)
        }

        fn is_up(&self) -> bool {
            self.wifi.is_up().unwrap_or(false)
        }

        fn ip_address(&self) -> Option<String> {
            self.wifi
                .sta_netif()
                .get_ip_info()
                .ok()
                .map(|info| info.ip.to_string())
        }

        fn rssi(&self) -> Option<i8> {
            use esp_idf_svc::sys::{ESP_OK, esp_wifi_sta_get_ap_info, wifi_ap_record_t};
            let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
            // SAFETY: `ap_info` is a valid out-parameter for the duration of the call.
            let ret = unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) };
            (ret == ESP_OK).then_some(ap_info.rssi)
        }

        fn drop_link(&mut self) {
            let _ = self.wifi.disconnect();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation radio
// ───────────────────────────────────────────────────────────────

/// Host-side radio: comes up on a chosen association attempt.
#[derive(Debug, Default)]
pub struct SimLink {
    /// `None` never connects.
    up_on_attempt: Option<u16>,
    attempts: u16,
    up: bool,
    hostname: String,
}

impl SimLink {
    pub fn new(up_on_attempt: Option<u16>) -> Self {
        Self {
            up_on_attempt,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u16 {
        self.attempts
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Simulate the access point going away.
    pub fn lose_link(&mut self) {
        self.up = false;
        self.up_on_attempt = None;
    }
}

impl WifiLink for SimLink {
    fn configure(
        &mut self,
        _ssid: &str,
        _password: &str,
        hostname: &str,
    ) -> Result<(), ConnectivityError> {
        hostname.clone_into(&mut self.hostname);
        Ok(())
    }

    fn associate(&mut self) -> Result<(), ConnectivityError> {
        self.attempts += 1;
        self.up = self.up_on_attempt.is_some_and(|n| self.attempts >= n);
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.up
    }

    fn ip_address(&self) -> Option<String> {
        self.up.then(|| "192.168.1.42".to_owned())
    }

    fn rssi(&self) -> Option<i8> {
        self.up.then_some(-60)
    }

    fn drop_link(&mut self) {
        self.up = false;
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
