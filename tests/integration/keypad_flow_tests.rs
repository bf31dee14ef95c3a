//! Key-by-key flows through the application core.

use alarmkeypad::alarm::AlarmState;
use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::ports::DEFAULT_PIN;
use alarmkeypad::app::service::AppService;
use alarmkeypad::error::Rejection;
use alarmkeypad::tones::Tone;

use super::mock_hw::{MockPins, RecordingSink, booted, type_keys};

#[test]
fn boot_announces_home() {
    let mut app = AppService::new(DEFAULT_PIN);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::Started(AlarmState::Home),
            AppEvent::StateChanged {
                state: AlarmState::Home,
                acknowledged: false
            },
        ]
    );
}

#[test]
fn away_command_full_event_sequence() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);

    type_keys(&mut app, "0000*1#", &mut pins, &mut sink);

    let echoes: Vec<char> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::KeyPressed { echo } => Some(*echo),
            _ => None,
        })
        .collect();
    assert_eq!(echoes, vec!['*', '*', '*', '*', '*', '1', '#']);
    assert_eq!(sink.count(&AppEvent::Tone(Tone::KeyBeep)), 7);

    let tail: Vec<AppEvent> = sink.events.iter().skip(14).cloned().collect();
    assert_eq!(
        tail,
        vec![
            AppEvent::EntryCleared,
            AppEvent::CapabilityPushed(AlarmState::Away),
            AppEvent::TriggerFired("setAlarmToAway"),
            AppEvent::StateChanged {
                state: AlarmState::Away,
                acknowledged: false
            },
            AppEvent::Tone(Tone::Success),
        ]
    );
    assert_eq!(app.query(), AlarmState::Away);
    assert_eq!(app.pending_entry(), "");
}

#[test]
fn every_key_beeps_before_it_echoes() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "12", &mut pins, &mut sink);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::Tone(Tone::KeyBeep),
            AppEvent::KeyPressed { echo: '*' },
            AppEvent::Tone(Tone::KeyBeep),
            AppEvent::KeyPressed { echo: '*' },
        ]
    );
}

#[test]
fn wrong_pin_rejects_and_keeps_state() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*2#", &mut pins, &mut sink);
    sink.take();

    type_keys(&mut app, "1234*1#", &mut pins, &mut sink);

    assert_eq!(app.query(), AlarmState::Sleep);
    let events = sink.take();
    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail,
        &[
            AppEvent::Rejected(Rejection::PinMismatch),
            AppEvent::Tone(Tone::Error),
            AppEvent::StateChanged {
                state: AlarmState::Sleep,
                acknowledged: false
            },
        ]
    );
    assert!(!events.iter().any(|e| matches!(e, AppEvent::TriggerFired(_))));
    assert_eq!(app.commands_rejected(), 1);
}

#[test]
fn bare_pin_means_home() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*1#", &mut pins, &mut sink);
    type_keys(&mut app, "0000#", &mut pins, &mut sink);
    assert_eq!(app.query(), AlarmState::Home);
    type_keys(&mut app, "0000*1#0000*#", &mut pins, &mut sink);
    assert_eq!(app.query(), AlarmState::Home);
}

#[test]
fn unknown_code_is_rejected_after_pin() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*42#", &mut pins, &mut sink);
    assert!(sink.events.contains(&AppEvent::Rejected(Rejection::UnknownCommand(42))));
    assert!(sink.events.contains(&AppEvent::Tone(Tone::Error)));
    assert_eq!(app.query(), AlarmState::Home);
}

#[test]
fn pin_change_persists_and_takes_effect() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);

    type_keys(&mut app, "0000*99*4321#", &mut pins, &mut sink);

    assert_eq!(pins.saves, vec!["4321".to_owned()]);
    assert_eq!(app.pin(), "4321");
    assert_eq!(sink.count(&AppEvent::Tone(Tone::Success)), 2);
    assert!(sink.events.contains(&AppEvent::PinChanged));

    // Old PIN no longer works, new one does.
    type_keys(&mut app, "0000*1#", &mut pins, &mut sink);
    assert_eq!(app.query(), AlarmState::Home);
    type_keys(&mut app, "4321*1#", &mut pins, &mut sink);
    assert_eq!(app.query(), AlarmState::Away);

    // A fresh boot reads the stored PIN.
    let (rebooted, _) = booted(&pins);
    assert_eq!(rebooted.pin(), "4321");
}

#[test]
fn pin_change_survives_storage_failure_in_memory() {
    let mut pins = MockPins::failing();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*99*55#", &mut pins, &mut sink);
    assert_eq!(app.pin(), "55");
    assert!(pins.saves.is_empty());
    assert!(sink.events.contains(&AppEvent::PinChanged));
}

#[test]
fn malformed_pin_change_is_silent() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*99#", &mut pins, &mut sink);
    assert!(sink.events.contains(&AppEvent::Rejected(Rejection::MalformedPinChange)));
    assert_eq!(sink.count(&AppEvent::Tone(Tone::Error)), 0);
    assert_eq!(app.pin(), "0000");
    assert!(pins.saves.is_empty());
}

#[test]
fn info_requests_screen_then_state() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*77#", &mut pins, &mut sink);
    let events = sink.take();
    assert_eq!(
        &events[events.len() - 2..],
        &[AppEvent::InfoRequested, AppEvent::StateRequested]
    );
}

#[test]
fn reboot_and_easter_egg() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*88#", &mut pins, &mut sink);
    assert_eq!(sink.events.last(), Some(&AppEvent::RestartRequested));
    type_keys(&mut app, "0000*1990#", &mut pins, &mut sink);
    assert_eq!(sink.events.last(), Some(&AppEvent::Tone(Tone::EasterEgg)));
    assert_eq!(app.query(), AlarmState::Home);
}

#[test]
fn repeated_state_repeats_trigger() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    type_keys(&mut app, "0000*8#0000*8#", &mut pins, &mut sink);
    assert_eq!(sink.count(&AppEvent::TriggerFired("setAlarmToSchedule")), 2);
    assert_eq!(sink.count(&AppEvent::CapabilityPushed(AlarmState::Schedule)), 2);
}
