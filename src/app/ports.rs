//! Seams between the alarm core and everything it drives.
//!
//! [`AppService`](super::service::AppService) is generic over these traits.
//! The indicators and the bridge sit behind [`EventSink`]; NVS sits behind
//! [`PinPort`], [`ConfigPort`] and [`StoragePort`].  Host tests substitute
//! in-memory versions.
//!
//! The PIN must never reach an `info`-level log line.

use core::fmt;

use crate::config::KeypadConfig;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Outbound events
// ───────────────────────────────────────────────────────────────

/// Receives every [`AppEvent`] the core produces, in order.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Fan an event out to two sinks, `self` first.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &AppEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// PIN persistence
// ───────────────────────────────────────────────────────────────

/// Loads and persists the keypad PIN.
pub trait PinPort {
    /// Stored PIN, or the factory default when nothing is stored yet.
    fn load_pin(&self) -> Result<String, StorageError>;

    /// Persist a new PIN.  On failure the in-memory PIN is still replaced.
    fn save_pin(&mut self, pin: &str) -> Result<(), StorageError>;
}

/// PIN used until the user changes it.
pub const DEFAULT_PIN: &str = "0000";

// ───────────────────────────────────────────────────────────────
// Config and raw storage ports
// ───────────────────────────────────────────────────────────────

/// Persisted [`KeypadConfig`].
///
/// `save` refuses out-of-range values with [`ConfigError::ValidationFailed`];
/// nothing is clamped on the way in.
pub trait ConfigPort {
    /// Stored config, or the defaults on first boot.
    fn load(&self) -> Result<KeypadConfig, ConfigError>;

    fn save(&mut self, config: &KeypadConfig) -> Result<(), ConfigError>;
}

/// Namespaced blob store backing the config record.
pub trait StoragePort {
    /// The whole stored value, sized from what is stored.
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace the value and commit before returning.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Nothing stored yet.
    NotFound,
    /// Blob did not decode as a `KeypadConfig`.
    Corrupted,
    /// Names the offending field.
    ValidationFailed(&'static str),
    StorageFull,
    IoError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    NotFound,
    Full,
    IoError,
    /// Bytes present but unusable, e.g. a PIN that is not UTF-8.
    Corrupted,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no stored keypad config"),
            Self::Corrupted => write!(f, "stored keypad config is unreadable"),
            Self::ValidationFailed(field) => write!(f, "config rejected: {field}"),
            Self::StorageFull => write!(f, "no room to store config"),
            Self::IoError => write!(f, "config storage I/O failed"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "NVS partition full"),
            Self::IoError => write!(f, "NVS I/O error"),
            Self::Corrupted => write!(f, "stored value unreadable"),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => Self::NotFound,
            StorageError::Full => Self::StorageFull,
            StorageError::Corrupted => Self::Corrupted,
            StorageError::IoError => Self::IoError,
        }
    }
}
