//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`PinPort`], [`ConfigPort`] and [`StoragePort`] for the keypad.
//!
//! | namespace | key       | NVS type | contents                     |
//! |-----------|-----------|----------|------------------------------|
//! | `keypad`  | `pinCode` | string   | PIN, plain text              |
//! | `keypad`  | `cfg`     | blob     | postcard-encoded config      |
//!
//! The PIN is written as an NVS string so devices flashed with earlier
//! firmware keep their PIN.  It is stored in clear text; the encrypted NVS
//! partition is not used.  Each write is committed before returning, so a
//! power cut leaves either the old or the new value.

use log::{debug, info};

use crate::app::ports::{
    ConfigError, ConfigPort, DEFAULT_PIN, PinPort, StorageError, StoragePort,
};
use crate::config::KeypadConfig;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub const KEYPAD_NAMESPACE: &str = "keypad";
pub const PIN_KEY: &str = "pinCode";
pub const CONFIG_KEY: &str = "cfg";

/// NVS keys and namespaces are limited to 15 bytes plus the terminator.
const NVS_NAME_MAX: usize = 15;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsAdapter {
    /// Initialise NVS flash and return the adapter.
    ///
    /// On a full partition or a version mismatch the partition is erased and
    /// re-initialised; the PIN then falls back to the default.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS use.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                log::warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{namespace}::{key}")
    }

    /// Reject names NVS would silently truncate.
    fn check_name(name: &str) -> Result<(), StorageError> {
        if name.is_empty() || name.len() > NVS_NAME_MAX {
            return Err(StorageError::IoError);
        }
        Ok(())
    }

    /// NUL-terminated copy of an NVS namespace or key name.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; NVS_NAME_MAX + 1] {
        let mut buf = [0u8; NVS_NAME_MAX + 1];
        let len = name.len().min(NVS_NAME_MAX);
        buf[..len].copy_from_slice(&name.as_bytes()[..len]);
        buf
    }

    /// Open `namespace`, run `f` with the handle, close it again.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns = Self::c_name(namespace);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: `ns` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: `handle` was opened above and is not used afterwards.
        unsafe { nvs_close(handle) };
        result
    }

    #[cfg(target_os = "espidf")]
    fn map_err(ret: esp_err_t) -> StorageError {
        match ret {
            ESP_ERR_NVS_NOT_FOUND => StorageError::NotFound,
            ESP_ERR_NVS_NOT_ENOUGH_SPACE => StorageError::Full,
            _ => StorageError::IoError,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Blob store
// ───────────────────────────────────────────────────────────────

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        Self::check_name(namespace)?;
        Self::check_name(key)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .get(&Self::composite_key(namespace, key))
                .cloned()
                .ok_or(StorageError::NotFound)
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_nvs_handle(namespace, false, |handle| {
                let mut size: usize = 0;
                // First call: size only.
                let ret = unsafe {
                    nvs_get_blob(handle, k.as_ptr().cast(), core::ptr::null_mut(), &mut size)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                if size == 0 {
                    return Ok(Vec::new());
                }
                let mut buf = vec![0u8; size];
                // SAFETY: `buf` is valid for `size` bytes; `k` is NUL-terminated.
                let ret = unsafe {
                    nvs_get_blob(handle, k.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                buf.truncate(size);
                Ok(buf)
            })
            .map_err(Self::map_err)
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        Self::check_name(namespace)?;
        Self::check_name(key)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .insert(Self::composite_key(namespace, key), data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_nvs_handle(namespace, true, |handle| {
                // SAFETY: `data` is valid for its length; `k` is NUL-terminated.
                let ret = unsafe {
                    nvs_set_blob(handle, k.as_ptr().cast(), data.as_ptr().cast(), data.len())
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret == ESP_OK { Ok(()) } else { Err(ret) }
            })
            .map_err(Self::map_err)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// PIN
// ───────────────────────────────────────────────────────────────

impl PinPort for NvsAdapter {
    fn load_pin(&self) -> Result<String, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        let stored = self.read(KEYPAD_NAMESPACE, PIN_KEY);

        #[cfg(target_os = "espidf")]
        let stored = {
            let k = Self::c_name(PIN_KEY);
            Self::with_nvs_handle(KEYPAD_NAMESPACE, false, |handle| {
                let mut size: usize = 0;
                // First call: length including the trailing NUL.
                let ret = unsafe {
                    nvs_get_str(handle, k.as_ptr().cast(), core::ptr::null_mut(), &mut size)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let mut buf = vec![0u8; size.max(1)];
                let mut size = buf.len();
                // SAFETY: `buf` is valid for `size` bytes including the NUL.
                let ret = unsafe {
                    nvs_get_str(handle, k.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                buf.truncate(size.saturating_sub(1));
                Ok(buf)
            })
            .map_err(Self::map_err)
        };

        match stored {
            Ok(bytes) => {
                let pin = String::from_utf8(bytes).map_err(|_| StorageError::Corrupted)?;
                info!("NvsAdapter: loaded PIN ({} digits)", pin.len());
                debug!("NvsAdapter: PIN {:?}", pin);
                Ok(pin)
            }
            Err(StorageError::NotFound) => {
                info!("NvsAdapter: no stored PIN, using default");
                Ok(DEFAULT_PIN.to_owned())
            }
            Err(e) => Err(e),
        }
    }

    /// Any length is accepted here; NVS itself refuses strings over
    /// ~4000 bytes, which surfaces as [`StorageError::IoError`].
    fn save_pin(&mut self, pin: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        self.write(KEYPAD_NAMESPACE, PIN_KEY, pin.as_bytes())?;

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(PIN_KEY);
            let mut value = Vec::with_capacity(pin.len() + 1);
            value.extend_from_slice(pin.as_bytes());
            value.push(0);
            Self::with_nvs_handle(KEYPAD_NAMESPACE, true, |handle| {
                // SAFETY: `value` is NUL-terminated and outlives the call.
                let ret = unsafe { nvs_set_str(handle, k.as_ptr().cast(), value.as_ptr().cast()) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret == ESP_OK { Ok(()) } else { Err(ret) }
            })
            .map_err(|ret| {
                log::warn!("NvsAdapter: PIN write failed (rc={})", ret);
                Self::map_err(ret)
            })?;
        }

        info!("NvsAdapter: PIN saved ({} digits)", pin.len());
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Config
// ───────────────────────────────────────────────────────────────

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<KeypadConfig, ConfigError> {
        let stored = self.read(KEYPAD_NAMESPACE, CONFIG_KEY);

        match stored {
            Ok(bytes) => {
                let cfg: KeypadConfig =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            Err(StorageError::NotFound) => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(KeypadConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, config: &KeypadConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write(KEYPAD_NAMESPACE, CONFIG_KEY, &bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::log_sink::LogEventSink;
    use crate::app::service::AppService;

    fn nvs() -> NvsAdapter {
        NvsAdapter::new().unwrap()
    }

    #[test]
    fn fresh_store_yields_default_pin() {
        assert_eq!(nvs().load_pin().unwrap(), "0000");
    }

    #[test]
    fn pin_round_trip() {
        let mut n = nvs();
        n.save_pin("1234").unwrap();
        assert_eq!(n.load_pin().unwrap(), "1234");
        assert_eq!(n.read(KEYPAD_NAMESPACE, PIN_KEY).unwrap(), b"1234");
    }

    #[test]
    fn empty_pin_is_stored_verbatim() {
        let mut n = nvs();
        n.save_pin("").unwrap();
        assert_eq!(n.load_pin().unwrap(), "");
    }

    #[test]
    fn long_pin_round_trip() {
        let mut n = nvs();
        let long = "1".repeat(300);
        n.save_pin(&long).unwrap();
        assert_eq!(n.load_pin().unwrap(), long);
    }

    #[test]
    fn long_pin_change_survives_reboot() {
        let mut n = nvs();
        let mut app = AppService::new(n.load_pin().unwrap());
        let mut sink = LogEventSink::new();
        let new_pin = "1".repeat(65);
        app.submit(&format!("0000*99*{new_pin}"), &mut n, &mut sink);
        assert_eq!(app.pin(), new_pin);

        let rebooted = AppService::new(n.load_pin().unwrap());
        assert_eq!(rebooted.pin(), new_pin);
    }

    #[test]
    fn non_utf8_pin_is_corrupted() {
        let mut n = nvs();
        n.write(KEYPAD_NAMESPACE, PIN_KEY, &[0xFF, 0xFE]).unwrap();
        assert_eq!(n.load_pin(), Err(StorageError::Corrupted));
    }

    #[test]
    fn config_defaults_when_missing() {
        assert_eq!(nvs().load().unwrap(), KeypadConfig::default());
    }

    #[test]
    fn config_round_trip() {
        let mut n = nvs();
        let cfg = KeypadConfig {
            backlight_timeout_ms: 30_000,
            ..KeypadConfig::default()
        };
        n.save(&cfg).unwrap();
        assert_eq!(n.load().unwrap(), cfg);
    }

    #[test]
    fn invalid_config_is_not_persisted() {
        let mut n = nvs();
        let cfg = KeypadConfig {
            led_brightness: 0,
            ..KeypadConfig::default()
        };
        assert!(matches!(n.save(&cfg), Err(ConfigError::ValidationFailed(_))));
        assert_eq!(
            n.read(KEYPAD_NAMESPACE, CONFIG_KEY),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn garbage_config_is_corrupted() {
        let mut n = nvs();
        n.write(KEYPAD_NAMESPACE, CONFIG_KEY, &[0xFF; 3]).unwrap();
        assert_eq!(n.load(), Err(ConfigError::Corrupted));
    }

    #[test]
    fn overlong_key_is_refused() {
        let mut n = nvs();
        assert_eq!(
            n.write(KEYPAD_NAMESPACE, "a_key_that_is_too_long", b"x"),
            Err(StorageError::IoError)
        );
    }

    #[test]
    fn namespace_isolation() {
        let mut n = nvs();
        n.write("a", "k", b"one").unwrap();
        n.write("b", "k", b"two").unwrap();
        assert_eq!(n.read("a", "k").unwrap(), b"one");
        assert_eq!(n.read("b", "k").unwrap(), b"two");
        assert_eq!(n.read("c", "k"), Err(StorageError::NotFound));
    }
}
