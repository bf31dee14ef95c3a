//! Fuzz target: keypad command pipeline
//!
//! Maps each input byte onto one of the twelve keys and feeds the sequence
//! to the application core.  Without the correct PIN the alarm state must
//! never move away from its boot value.
//!
//! cargo fuzz run fuzz_key_sequence

#![no_main]

use alarmkeypad::alarm::AlarmState;
use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::ports::{EventSink, PinPort, StorageError};
use alarmkeypad::app::service::AppService;
use alarmkeypad::keypad::KEYMAP;
use libfuzzer_sys::fuzz_target;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct NoStore;

impl PinPort for NoStore {
    fn load_pin(&self) -> Result<String, StorageError> {
        Err(StorageError::NotFound)
    }

    fn save_pin(&mut self, _pin: &str) -> Result<(), StorageError> {
        Err(StorageError::IoError)
    }
}

fuzz_target!(|data: &[u8]| {
    // A PIN no key sequence can produce.
    let mut app = AppService::new("A");
    for byte in data {
        let idx = usize::from(*byte) % 12;
        let key = KEYMAP[idx / 3][idx % 3];
        app.handle_key(key, &mut NoStore, &mut Discard);
    }
    assert_eq!(app.query(), AlarmState::Home);
    assert_eq!(app.commands_accepted(), 0);
});
