//! Error types for the alarm keypad firmware.
//!
//! Two families:
//!
//! - [`Rejection`]: a user or bridge input the core declined.  Non-fatal;
//!   reported as [`AppEvent::Rejected`], some also with an error tone.
//!   Nothing is retried.
//! - [`Error`]: infrastructure failures every adapter error converts into,
//!   so `main` can propagate them with `?`.
//!
//! [`AppEvent::Rejected`]: crate::app::events::AppEvent::Rejected

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::app::ports::{ConfigError, StorageError};
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a command or push was declined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// PIN segment did not match the stored PIN.
    PinMismatch,
    /// PIN accepted but the code has no table entry.
    UnknownCommand(u32),
    /// External push used a token outside the vocabulary.
    UnknownExternalToken(String),
    /// PIN-change command without the second separator.
    MalformedPinChange,
    /// Bridge "set" action carried a code that is not a resting state.
    InvalidStateCode(i32),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinMismatch => write!(f, "incorrect PIN code"),
            Self::UnknownCommand(code) => write!(f, "invalid command {code}"),
            Self::UnknownExternalToken(token) => write!(f, "invalid external state {token:?}"),
            Self::MalformedPinChange => write!(f, "invalid PIN change format"),
            Self::InvalidStateCode(code) => write!(f, "invalid alarm state code {code}"),
        }
    }
}

impl Rejection {
    /// Whether the keypad user hears the error tone for this rejection.
    ///
    /// Bridge-side rejections and the malformed PIN change are log-only.
    pub fn is_audible(&self) -> bool {
        matches!(self, Self::PinMismatch | Self::UnknownCommand(_))
    }
}

// ---------------------------------------------------------------------------
// Firmware error
// ---------------------------------------------------------------------------

/// Every fallible infrastructure operation funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Persistent storage failed.
    Storage(StorageError),
    /// Stored or supplied configuration was invalid.
    Config(ConfigError),
    /// Network connectivity failed.
    Comms(ConnectivityError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Comms(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
