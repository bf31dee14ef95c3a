//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: redraw the display, light the status
//! LEDs, play a melody, forward to the bridge, or just log.

use crate::alarm::AlarmState;
use crate::error::Rejection;
use crate::tones::Tone;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the boot state).
    Started(AlarmState),

    /// A key was pressed; `echo` is what the entry line shows.
    KeyPressed { echo: char },

    /// The entry line should be wiped (command submitted).
    EntryCleared,

    /// Current state to render; `acknowledged` selects flashing indicators.
    StateChanged { state: AlarmState, acknowledged: bool },

    /// Bridge capability value push.
    CapabilityPushed(AlarmState),

    /// Bridge trigger by name.
    TriggerFired(&'static str),

    /// Play a melody.
    Tone(Tone),

    /// Show the diagnostic info screen.
    InfoRequested,

    /// Ask the bridge to re-send the current state.
    StateRequested,

    /// Restart the device.
    RestartRequested,

    /// The PIN was replaced.
    PinChanged,

    /// An input was declined.
    Rejected(Rejection),
}

/// Trigger the bridge answers by re-sending the alarm state.
pub const STATE_REQUEST_TRIGGER: &str = "getAlarmState";
