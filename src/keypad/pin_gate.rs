//! PIN validation.

use super::SEPARATOR;
use crate::error::Rejection;

/// A submitted command split at its first separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCommand<'a> {
    pub pin: &'a str,
    /// Everything after the first separator; `None` if there was none.
    pub rest: Option<&'a str>,
}

impl<'a> SplitCommand<'a> {
    pub fn parse(command: &'a str) -> Self {
        match command.split_once(SEPARATOR) {
            Some((pin, rest)) => Self { pin, rest: Some(rest) },
            None => Self { pin: command, rest: None },
        }
    }
}

/// Holds the in-memory copy of the stored PIN and checks commands against it.
///
/// The comparison is plain, exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct PinGate {
    pin: String,
}

impl PinGate {
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// Split `command` and check its PIN segment.
    ///
    /// Returns the remainder after the separator on success.
    pub fn check_and_split<'a>(&self, command: &'a str) -> Result<Option<&'a str>, Rejection> {
        let split = SplitCommand::parse(command);
        if split.pin == self.pin {
            Ok(split.rest)
        } else {
            Err(Rejection::PinMismatch)
        }
    }

    /// Replace the cached PIN.  Persistence is the caller's job.
    pub fn set_pin(&mut self, pin: impl Into<String>) {
        self.pin = pin.into();
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }
}
