//! Bridge round trips: inbound JSON → core → outbound JSON.

use alarmkeypad::adapters::bridge::{BridgeAdapter, Inbound};
use alarmkeypad::alarm::AlarmState;
use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::service::AppService;
use alarmkeypad::error::Rejection;
use alarmkeypad::tones::Tone;

use super::mock_hw::{MockPins, RecordingSink, booted, type_keys};

/// Drain the bridge inbox into the core, the way the control loop does.
fn pump(
    app: &mut AppService,
    bridge: &mut BridgeAdapter,
    pins: &mut MockPins,
    sink: &mut RecordingSink,
) {
    while let Some(msg) = bridge.next_inbound() {
        match msg {
            Inbound::GetAlarmState => bridge.answer_state(app.query()),
            other => {
                if let Some(cmd) = other.into_command() {
                    app.handle_command(cmd, pins, &mut (&mut *bridge, &mut *sink));
                }
            }
        }
    }
}

#[test]
fn keypad_state_change_reaches_bridge() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    type_keys(&mut app, "0000*3#", &mut pins, &mut (&mut bridge, &mut sink));

    assert_eq!(
        bridge.drain_outbox(),
        vec![
            r#"{"type":"capability","name":"state","value":3}"#.to_owned(),
            r#"{"type":"trigger","name":"setAlarmToAlert"}"#.to_owned(),
        ]
    );
}

#[test]
fn set_action_behaves_like_local_change() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    bridge.receive(r#"{"action":"setAlarmState","value":1}"#).unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);

    assert_eq!(app.query(), AlarmState::Away);
    assert!(!app.acknowledged());
    assert_eq!(bridge.drain_outbox().len(), 2);
}

#[test]
fn invalid_set_code_is_refused() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    bridge.receive(r#"{"action":"setAlarmState","value":5}"#).unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);

    assert_eq!(app.query(), AlarmState::Home);
    assert_eq!(sink.events, vec![AppEvent::Rejected(Rejection::InvalidStateCode(5))]);
    assert_eq!(bridge.pending_outbound(), 0);
}

#[test]
fn external_change_is_acknowledged_and_not_echoed() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    bridge
        .receive(r#"{"action":"handleEufyStateChange","value":"custom_1"}"#)
        .unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);

    assert_eq!(app.query(), AlarmState::Sleep);
    assert!(app.acknowledged());
    assert_eq!(
        sink.events,
        vec![
            AppEvent::StateChanged {
                state: AlarmState::Sleep,
                acknowledged: true
            },
            AppEvent::Tone(Tone::Acknowledge),
        ]
    );
    assert_eq!(bridge.pending_outbound(), 0);
}

#[test]
fn unknown_external_token_changes_nothing() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    bridge
        .receive(r#"{"action":"handleEufyStateChange","value":"vacation"}"#)
        .unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);

    assert_eq!(app.query(), AlarmState::Home);
    assert!(!app.acknowledged());
    assert_eq!(
        sink.events,
        vec![AppEvent::Rejected(Rejection::UnknownExternalToken(
            "vacation".into()
        ))]
    );
}

#[test]
fn local_command_clears_acknowledgement() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    bridge
        .receive(r#"{"action":"handleEufyStateChange","value":"away"}"#)
        .unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);
    assert!(app.acknowledged());

    type_keys(&mut app, "0000*1#", &mut pins, &mut sink);
    assert_eq!(app.query(), AlarmState::Away);
    assert!(!app.acknowledged());
}

#[test]
fn state_condition_answers_current_state() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    type_keys(&mut app, "0000*8#", &mut pins, &mut sink);
    bridge.receive(r#"{"action":"getAlarmState"}"#).unwrap();
    pump(&mut app, &mut bridge, &mut pins, &mut sink);

    assert_eq!(
        bridge.drain_outbox(),
        vec![r#"{"type":"condition","name":"getAlarmState","value":8}"#.to_owned()]
    );
}

#[test]
fn info_command_requests_state_from_bridge() {
    let mut pins = MockPins::new();
    let (mut app, mut sink) = booted(&pins);
    let mut bridge = BridgeAdapter::new();

    type_keys(&mut app, "0000*77#", &mut pins, &mut (&mut bridge, &mut sink));

    assert_eq!(
        bridge.drain_outbox(),
        vec![r#"{"type":"trigger","name":"getAlarmState"}"#.to_owned()]
    );
    assert_eq!(app.query(), AlarmState::Home);
}
