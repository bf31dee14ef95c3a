//! Mock adapters for integration tests.
//!
//! Records every emitted event and every PIN write so tests can assert on
//! the full history without touching NVS or GPIO.

use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::ports::{DEFAULT_PIN, EventSink, PinPort, StorageError};
use alarmkeypad::app::service::AppService;

// ── Recording sink ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<AppEvent> {
        core::mem::take(&mut self.events)
    }

    pub fn count(&self, wanted: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockPins ──────────────────────────────────────────────────

pub struct MockPins {
    pub stored: Option<String>,
    pub saves: Vec<String>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockPins {
    pub fn new() -> Self {
        Self {
            stored: None,
            saves: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }
}

impl Default for MockPins {
    fn default() -> Self {
        Self::new()
    }
}

impl PinPort for MockPins {
    fn load_pin(&self) -> Result<String, StorageError> {
        Ok(self.stored.clone().unwrap_or_else(|| DEFAULT_PIN.to_owned()))
    }

    fn save_pin(&mut self, pin: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.saves.push(pin.to_owned());
        self.stored = Some(pin.to_owned());
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Feed every character of `keys` as a key press.
pub fn type_keys(
    app: &mut AppService,
    keys: &str,
    pins: &mut impl PinPort,
    sink: &mut impl EventSink,
) {
    for key in keys.chars() {
        app.handle_key(key, pins, sink);
    }
}

/// Started service using whatever PIN `pins` holds.
pub fn booted(pins: &MockPins) -> (AppService, RecordingSink) {
    let mut app = AppService::new(pins.load_pin().unwrap());
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    sink.take();
    (app, sink)
}
