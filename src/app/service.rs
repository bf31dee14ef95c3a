//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the key buffer, the PIN gate and the alarm state
//! machine.  It is the explicit context the control loop holds; nothing in
//! the pipeline lives in a global.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  AppCommand ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService           │
//!     PinPort ◀──▶│ KeyBuffer · PinGate · Alarm   │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::alarm::machine::AlarmStateMachine;
use crate::alarm::AlarmState;
use crate::error::Rejection;
use crate::keypad::buffer::KeyBuffer;
use crate::keypad::decoder::decode;
use crate::keypad::dispatch::{resolve, Action};
use crate::keypad::pin_gate::PinGate;
use crate::tones::Tone;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, PinPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    buffer: KeyBuffer,
    gate: PinGate,
    alarm: AlarmStateMachine,
    commands_accepted: u32,
    commands_rejected: u32,
}

impl AppService {
    /// Construct the service around the PIN loaded at boot.
    ///
    /// Does **not** announce anything; call [`start`](Self::start) next.
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            buffer: KeyBuffer::new(),
            gate: PinGate::new(pin),
            alarm: AlarmStateMachine::new(),
            commands_accepted: 0,
            commands_rejected: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the boot state so every indicator draws it.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.alarm.query()));
        self.alarm.refresh(sink);
        info!("AppService started in {}", self.alarm.query());
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an inbound command from the keypad scanner or the bridge.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        pins: &mut impl PinPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Key(key) => self.handle_key(key, pins, sink),
            AppCommand::SetAlarmState(code) => self.set_alarm_state(code, sink),
            AppCommand::ExternalStateChange(token) => {
                self.alarm.set_from_external(&token, sink);
            }
        }
    }

    /// Feed one key press.  The terminator submits the pending command.
    pub fn handle_key(&mut self, key: char, pins: &mut impl PinPort, sink: &mut impl EventSink) {
        let outcome = self.buffer.on_key(key);
        sink.emit(&AppEvent::Tone(Tone::KeyBeep));
        sink.emit(&AppEvent::KeyPressed { echo: outcome.echo });

        if let Some(command) = outcome.submitted {
            sink.emit(&AppEvent::EntryCleared);
            self.submit(&command, pins, sink);
        }
    }

    /// Run a complete command through gate, decoder and dispatcher.
    pub fn submit(&mut self, command: &str, pins: &mut impl PinPort, sink: &mut impl EventSink) {
        debug!("Keypad: submitted {:?}", command);

        let rest = match self.gate.check_and_split(command) {
            Ok(rest) => rest,
            Err(rejection) => {
                self.reject(rejection, sink);
                return;
            }
        };

        let code = decode(rest);
        let action = resolve(code, command);
        info!("Keypad: command {} -> {:?}", code, action_name(&action));
        self.execute(action, pins, sink);
    }

    /// Bridge "Set Alarm State" action.
    ///
    /// Codes outside the resting set are refused and leave the state alone.
    pub fn set_alarm_state(&mut self, code: i32, sink: &mut impl EventSink) {
        match AlarmState::from_code(code) {
            Some(state) => self.alarm.set_local(state, sink),
            None => {
                warn!("Bridge: refusing alarm state code {}", code);
                sink.emit(&AppEvent::Rejected(Rejection::InvalidStateCode(code)));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Bridge "Get Alarm State" condition.
    pub fn query(&self) -> AlarmState {
        self.alarm.query()
    }

    /// Whether the current state came from an external push.
    pub fn acknowledged(&self) -> bool {
        self.alarm.acknowledged()
    }

    /// The PIN currently accepted by the gate.
    pub fn pin(&self) -> &str {
        self.gate.pin()
    }

    /// Characters typed since the last submission.
    pub fn pending_entry(&self) -> &str {
        self.buffer.pending()
    }

    /// Commands that passed the PIN gate and had a table entry.
    pub fn commands_accepted(&self) -> u32 {
        self.commands_accepted
    }

    /// Commands refused with an error tone.
    pub fn commands_rejected(&self) -> u32 {
        self.commands_rejected
    }

    // ── Internal ──────────────────────────────────────────────

    fn execute(&mut self, action: Action, pins: &mut impl PinPort, sink: &mut impl EventSink) {
        match action {
            Action::SetState(state) => {
                self.commands_accepted += 1;
                self.alarm.set_local(state, sink);
                sink.emit(&AppEvent::Tone(Tone::Success));
            }
            Action::ShowInfo => {
                self.commands_accepted += 1;
                sink.emit(&AppEvent::InfoRequested);
                sink.emit(&AppEvent::StateRequested);
            }
            Action::Restart => {
                self.commands_accepted += 1;
                info!("Keypad: restart requested");
                sink.emit(&AppEvent::RestartRequested);
            }
            Action::ChangePin { new_pin: Some(new_pin) } => {
                self.commands_accepted += 1;
                self.change_pin(&new_pin, pins, sink);
            }
            Action::ChangePin { new_pin: None } => {
                self.reject(Rejection::MalformedPinChange, sink);
            }
            Action::EasterEgg => {
                self.commands_accepted += 1;
                sink.emit(&AppEvent::Tone(Tone::EasterEgg));
            }
            Action::Unknown(code) => self.reject(Rejection::UnknownCommand(code), sink),
        }
    }

    fn change_pin(&mut self, new_pin: &str, pins: &mut impl PinPort, sink: &mut impl EventSink) {
        self.gate.set_pin(new_pin);
        debug!("Keypad: new PIN {:?}", new_pin);

        // In-memory PIN stays authoritative until the next successful write.
        if let Err(e) = pins.save_pin(new_pin) {
            warn!("Keypad: PIN save failed: {}", e);
        }

        info!("Keypad: PIN changed");
        sink.emit(&AppEvent::PinChanged);
        sink.emit(&AppEvent::Tone(Tone::Success));
        sink.emit(&AppEvent::Tone(Tone::Success));
    }

    /// Audible rejections also get the error tone and a state redraw.
    fn reject(&mut self, rejection: Rejection, sink: &mut impl EventSink) {
        warn!("Keypad: {}", rejection);
        let audible = rejection.is_audible();
        sink.emit(&AppEvent::Rejected(rejection));
        if !audible {
            return;
        }
        self.commands_rejected += 1;
        sink.emit(&AppEvent::Tone(Tone::Error));
        self.alarm.refresh(sink);
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SetState(_) => "set-state",
        Action::ShowInfo => "info",
        Action::Restart => "restart",
        Action::ChangePin { .. } => "change-pin",
        Action::EasterEgg => "easter-egg",
        Action::Unknown(_) => "unknown",
    }
}
