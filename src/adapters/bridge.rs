//! Home-automation bridge adapter.
//!
//! Implements [`EventSink`] for the outbound half of the bridge protocol and
//! queues inbound actions for the control loop.  Messages are JSON objects,
//! one per line, moved by whatever transport the binary wires up (the HTTP
//! server on the device, direct calls in tests).
//!
//! ```text
//!  outbound                                     inbound
//!  {"type":"capability","name":"state","value":1}
//!  {"type":"trigger","name":"setAlarmToAway"}   {"action":"setAlarmState","value":1}
//!  {"type":"trigger","name":"getAlarmState"}    {"action":"handleEufyStateChange","value":"home"}
//!  {"type":"condition","name":"getAlarmState",  {"action":"getAlarmState"}
//!   "value":1}
//! ```
//!
//! Both queues are bounded; when full the oldest outbound message is dropped
//! and new inbound messages are refused.

use core::fmt;

use heapless::Deque;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::alarm::AlarmState;
use crate::app::commands::AppCommand;
use crate::app::events::{AppEvent, STATE_REQUEST_TRIGGER};
use crate::app::ports::EventSink;

pub const OUTBOX_CAPACITY: usize = 16;
pub const INBOX_CAPACITY: usize = 8;

/// Capability carrying the alarm state code.
pub const STATE_CAPABILITY: &str = "state";
/// Condition answered with the alarm state code.
pub const STATE_CONDITION: &str = "getAlarmState";

// ───────────────────────────────────────────────────────────────
// Wire messages
// ───────────────────────────────────────────────────────────────

/// Device → bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Capability { name: String, value: i32 },
    Trigger { name: String },
    Condition { name: String, value: i32 },
}

/// Bridge → device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value")]
pub enum Inbound {
    #[serde(rename = "setAlarmState")]
    SetAlarmState(i32),
    #[serde(rename = "handleEufyStateChange")]
    HandleEufyStateChange(String),
    #[serde(rename = "getAlarmState")]
    GetAlarmState,
}

impl Inbound {
    /// The command this action becomes, or `None` for the state condition.
    pub fn into_command(self) -> Option<AppCommand> {
        match self {
            Self::SetAlarmState(code) => Some(AppCommand::SetAlarmState(code)),
            Self::HandleEufyStateChange(token) => Some(AppCommand::ExternalStateChange(token)),
            Self::GetAlarmState => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Not valid JSON or not a known action.
    Malformed,
    /// The control loop has not drained earlier actions yet.
    InboxFull,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed bridge message"),
            Self::InboxFull => write!(f, "bridge inbox full"),
        }
    }
}

impl std::error::Error for BridgeError {}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BridgeAdapter {
    outbox: Deque<String, OUTBOX_CAPACITY>,
    inbox: Deque<Inbound, INBOX_CAPACITY>,
    dropped: u32,
}

impl Default for BridgeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeAdapter {
    pub const fn new() -> Self {
        Self {
            outbox: Deque::new(),
            inbox: Deque::new(),
            dropped: 0,
        }
    }

    /// Parse and queue one inbound message.
    pub fn receive(&mut self, json: &str) -> Result<(), BridgeError> {
        let msg: Inbound = serde_json::from_str(json).map_err(|e| {
            warn!("BRIDGE | malformed inbound message: {}", e);
            BridgeError::Malformed
        })?;
        debug!("BRIDGE | queueing {:?}", msg);
        self.inbox.push_back(msg).map_err(|refused| {
            warn!("BRIDGE | inbox full, refusing {:?}", refused);
            BridgeError::InboxFull
        })
    }

    /// Next inbound action, oldest first.
    pub fn next_inbound(&mut self) -> Option<Inbound> {
        self.inbox.pop_front()
    }

    /// Answer the state condition.
    pub fn answer_state(&mut self, state: AlarmState) {
        self.send(&Outbound::Condition {
            name: STATE_CONDITION.to_owned(),
            value: state.code(),
        });
    }

    /// Take every queued outbound message, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<String> {
        core::iter::from_fn(|| self.outbox.pop_front()).collect()
    }

    pub fn pending_outbound(&self) -> usize {
        self.outbox.len()
    }

    /// Outbound messages lost to a full outbox.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn send(&mut self, msg: &Outbound) {
        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                warn!("BRIDGE | cannot encode {:?}: {}", msg, e);
                return;
            }
        };
        if self.outbox.is_full() {
            self.outbox.pop_front();
            self.dropped += 1;
            warn!("BRIDGE | outbox full, dropped oldest message");
        }
        // Room was just made.
        let _ = self.outbox.push_back(json);
    }
}

impl EventSink for BridgeAdapter {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::CapabilityPushed(state) => self.send(&Outbound::Capability {
                name: STATE_CAPABILITY.to_owned(),
                value: state.code(),
            }),
            AppEvent::TriggerFired(name) => self.send(&Outbound::Trigger {
                name: (*name).to_owned(),
            }),
            AppEvent::StateRequested => self.send(&Outbound::Trigger {
                name: STATE_REQUEST_TRIGGER.to_owned(),
            }),
            _ => {}
        }
    }
}
