//! Alarm state vocabulary and the flat state machine.
//!
//! ```text
//!   ┌──────┐  ┌──────┐  ┌───────┐  ┌───────┐  ┌──────────┐  ┌──────────┐
//!   │ Home │  │ Away │  │ Sleep │  │ Alert │  │ Schedule │  │ Disarmed │
//!   └──────┘  └──────┘  └───────┘  └───────┘  └──────────┘  └──────────┘
//!        any state ──[set_local / set_from_external]──▶ any state
//! ```
//!
//! The integer codes are shared with the bridge and must not change.
//! `Unknown` only ever comes back from a failed vocabulary lookup; the
//! machine never rests in it.

pub mod machine;

use core::fmt;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Alarm state as exchanged with the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum AlarmState {
    Unknown = -1,
    #[default]
    Home = 0,
    Away = 1,
    Sleep = 2,
    Alert = 3,
    Schedule = 8,
    Disarmed = 9,
}

impl AlarmState {
    /// Every state the machine may rest in.
    pub const RESTING: [AlarmState; 6] = [
        Self::Home,
        Self::Away,
        Self::Sleep,
        Self::Alert,
        Self::Schedule,
        Self::Disarmed,
    ];

    /// Wire code used for the capability push and the state condition.
    pub const fn code(self) -> i32 {
        self as i8 as i32
    }

    /// Decode a wire code into a resting state.
    ///
    /// `-1` and any other unassigned value return `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Home),
            1 => Some(Self::Away),
            2 => Some(Self::Sleep),
            3 => Some(Self::Alert),
            8 => Some(Self::Schedule),
            9 => Some(Self::Disarmed),
            _ => None,
        }
    }

    /// Translate an inbound external-system token.
    ///
    /// The token is trimmed and lower-cased first; a miss yields `Unknown`.
    pub fn from_external(token: &str) -> Self {
        let normalized = token.trim().to_ascii_lowercase();
        EXTERNAL_VOCABULARY
            .iter()
            .find(|(name, _)| *name == normalized)
            .map_or(Self::Unknown, |(_, state)| *state)
    }

    /// Outbound bridge trigger for this state, if it has one.
    pub fn trigger_name(self) -> Option<&'static str> {
        TRIGGER_VOCABULARY
            .iter()
            .find(|(state, _)| *state == self)
            .map(|(_, name)| *name)
    }

    /// Short label rendered on the display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "THUIS",
            Self::Away => "AFWEZIG",
            Self::Sleep => "SLAPEN",
            Self::Alert => "ALERT",
            Self::Schedule => "SCHEMA",
            Self::Disarmed => "DISARMED",
            Self::Unknown => "ERROR",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Lower-case tokens pushed by the external alarm system.
pub const EXTERNAL_VOCABULARY: [(&str, AlarmState); 6] = [
    ("home", AlarmState::Home),
    ("away", AlarmState::Away),
    ("custom_1", AlarmState::Sleep),
    ("custom_2", AlarmState::Alert),
    ("schedule", AlarmState::Schedule),
    ("disarmed", AlarmState::Disarmed),
];

/// Bridge trigger fired after a local state change.
pub const TRIGGER_VOCABULARY: [(AlarmState, &str); 5] = [
    (AlarmState::Home, "setAlarmToHome"),
    (AlarmState::Away, "setAlarmToAway"),
    (AlarmState::Sleep, "setAlarmToSleep"),
    (AlarmState::Alert, "setAlarmToAlert"),
    (AlarmState::Schedule, "setAlarmToSchedule"),
];
