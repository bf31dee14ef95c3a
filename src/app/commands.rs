//! Inbound commands to the application service.
//!
//! These represent inputs from the outside world (keypad scanner, bridge
//! actions) that the [`AppService`](super::service::AppService) interprets
//! and acts upon.

/// Commands that adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// A debounced key press from the matrix keypad.
    Key(char),

    /// Bridge action "Set Alarm State": raw integer state code.
    SetAlarmState(i32),

    /// Bridge action "handleEufyStateChange": external vocabulary token.
    ExternalStateChange(String),
}
