//! The alarm state machine: current state plus the acknowledgement flag.
//!
//! Two ways in:
//!
//! - [`set_local`](AlarmStateMachine::set_local) for keypad commands and the
//!   bridge's explicit "set" action.  Pushes the capability value, fires the
//!   outbound trigger, refreshes the indicators.
//! - [`set_from_external`](AlarmStateMachine::set_from_external) for tokens
//!   pushed by the external alarm system.  Refreshes the indicators and plays
//!   the acknowledge tone, but never echoes back to the bridge.

use log::{info, warn};

use super::AlarmState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::Rejection;
use crate::tones::Tone;

/// Current alarm state and whether it still awaits local confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmStateMachine {
    state: AlarmState,
    acknowledged: bool,
}

impl AlarmStateMachine {
    /// Boot state: `Home`, not acknowledged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a locally originated state.
    ///
    /// Emits, in order: capability push, trigger (if the state has one),
    /// indicator refresh.  Repeating the same state repeats every event.
    pub fn set_local(&mut self, state: AlarmState, sink: &mut impl EventSink) {
        info!("Alarm: set locally to {}", state);
        self.state = state;
        self.acknowledged = false;

        sink.emit(&AppEvent::CapabilityPushed(state));
        if let Some(trigger) = state.trigger_name() {
            sink.emit(&AppEvent::TriggerFired(trigger));
        }
        self.refresh(sink);
    }

    /// Apply a state pushed by the external alarm system.
    ///
    /// Returns the new state, or `None` if the token was not recognised; in
    /// that case nothing changes and only a rejection is reported.
    pub fn set_from_external(
        &mut self,
        token: &str,
        sink: &mut impl EventSink,
    ) -> Option<AlarmState> {
        let state = AlarmState::from_external(token);
        if state == AlarmState::Unknown {
            warn!("Alarm: invalid external state {:?}", token);
            sink.emit(&AppEvent::Rejected(Rejection::UnknownExternalToken(
                token.to_owned(),
            )));
            return None;
        }

        info!("Alarm: external system changed state to {}", state);
        self.state = state;
        self.acknowledged = true;

        self.refresh(sink);
        sink.emit(&AppEvent::Tone(Tone::Acknowledge));
        Some(state)
    }

    /// Re-announce the current state so the indicators redraw.
    pub fn refresh(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::StateChanged {
            state: self.state,
            acknowledged: self.acknowledged,
        });
    }

    /// Current state (answers the bridge's state condition).
    pub fn query(&self) -> AlarmState {
        self.state
    }

    /// `true` when the state came from an external push.
    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }
}
