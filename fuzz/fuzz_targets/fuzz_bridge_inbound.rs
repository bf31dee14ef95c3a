//! Fuzz target: `BridgeAdapter::receive`
//!
//! Arbitrary request bodies must either queue a well-formed action or be
//! refused; the inbox never exceeds its capacity.
//!
//! cargo fuzz run fuzz_bridge_inbound

#![no_main]

use alarmkeypad::adapters::bridge::{BridgeAdapter, INBOX_CAPACITY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = core::str::from_utf8(data) else {
        return;
    };
    let mut bridge = BridgeAdapter::new();
    let mut queued = 0;
    for _ in 0..=INBOX_CAPACITY {
        if bridge.receive(body).is_ok() {
            queued += 1;
        }
    }
    assert!(queued <= INBOX_CAPACITY);

    let mut drained = 0;
    while bridge.next_inbound().is_some() {
        drained += 1;
    }
    assert_eq!(drained, queued);
});
