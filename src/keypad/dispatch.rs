//! Command code → action lookup.
//!
//! ```text
//! ┌──────┬───────────────────────────┐
//! │ code │ action                    │
//! ├──────┼───────────────────────────┤
//! │ 0    │ SetState(Home)            │
//! │ 1    │ SetState(Away)            │
//! │ 2    │ SetState(Sleep)           │
//! │ 3    │ SetState(Alert)           │
//! │ 8    │ SetState(Schedule)        │
//! │ 9    │ SetState(Disarmed)        │
//! │ 77   │ ShowInfo                  │
//! │ 88   │ Restart                   │
//! │ 99   │ ChangePin (needs raw cmd) │
//! │ 1990 │ EasterEgg                 │
//! └──────┴───────────────────────────┘
//! ```
//!
//! Code 99 is resolved before the table because its action carries data
//! taken from the raw command.

use super::SEPARATOR;
use crate::alarm::AlarmState;

pub const CMD_HOME: u32 = 0;
pub const CMD_AWAY: u32 = 1;
pub const CMD_SLEEP: u32 = 2;
pub const CMD_ALERT: u32 = 3;
pub const CMD_SCHEDULE: u32 = 8;
pub const CMD_DISARM: u32 = 9;
pub const CMD_INFO: u32 = 77;
pub const CMD_REBOOT: u32 = 88;
pub const CMD_CHANGE_PIN: u32 = 99;
pub const CMD_EASTER_EGG: u32 = 1990;

/// What an accepted command asks the device to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Local state transition with success tones.
    SetState(AlarmState),
    /// Show IP, build stamp and uptime, then re-request state from the bridge.
    ShowInfo,
    /// Restart the device.
    Restart,
    /// Replace the PIN; `None` when the command had no second separator.
    ChangePin { new_pin: Option<String> },
    /// Play the easter-egg melody.
    EasterEgg,
    /// No table entry.
    Unknown(u32),
}

/// Fixed dispatch table for the data-less actions.
pub static COMMAND_TABLE: [(u32, Action); 9] = [
    (CMD_HOME, Action::SetState(AlarmState::Home)),
    (CMD_AWAY, Action::SetState(AlarmState::Away)),
    (CMD_SLEEP, Action::SetState(AlarmState::Sleep)),
    (CMD_ALERT, Action::SetState(AlarmState::Alert)),
    (CMD_SCHEDULE, Action::SetState(AlarmState::Schedule)),
    (CMD_DISARM, Action::SetState(AlarmState::Disarmed)),
    (CMD_INFO, Action::ShowInfo),
    (CMD_REBOOT, Action::Restart),
    (CMD_EASTER_EGG, Action::EasterEgg),
];

/// Resolve a decoded code against the raw command it came from.
pub fn resolve(code: u32, raw_command: &str) -> Action {
    if code == CMD_CHANGE_PIN {
        return Action::ChangePin {
            new_pin: extract_new_pin(raw_command).map(str::to_owned),
        };
    }

    COMMAND_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(Action::Unknown(code), |(_, action)| action.clone())
}

/// Everything after the second separator, verbatim (may be empty).
pub fn extract_new_pin(raw_command: &str) -> Option<&str> {
    let (_, after_first) = raw_command.split_once(SEPARATOR)?;
    let (_, new_pin) = after_first.split_once(SEPARATOR)?;
    Some(new_pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes() {
        assert_eq!(resolve(0, "0000"), Action::SetState(AlarmState::Home));
        assert_eq!(resolve(1, "0000*1"), Action::SetState(AlarmState::Away));
        assert_eq!(resolve(2, "0000*2"), Action::SetState(AlarmState::Sleep));
        assert_eq!(resolve(3, "0000*3"), Action::SetState(AlarmState::Alert));
        assert_eq!(resolve(8, "0000*8"), Action::SetState(AlarmState::Schedule));
        assert_eq!(resolve(9, "0000*9"), Action::SetState(AlarmState::Disarmed));
    }

    #[test]
    fn admin_codes() {
        assert_eq!(resolve(77, "0000*77"), Action::ShowInfo);
        assert_eq!(resolve(88, "0000*88"), Action::Restart);
        assert_eq!(resolve(1990, "0000*1990"), Action::EasterEgg);
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        for code in [4, 5, 6, 7, 10, 98, 100, 1991, u32::MAX] {
            assert_eq!(resolve(code, ""), Action::Unknown(code));
        }
    }

    #[test]
    fn change_pin_extracts_after_second_separator() {
        assert_eq!(
            resolve(99, "0000*99*1234"),
            Action::ChangePin {
                new_pin: Some("1234".to_owned())
            }
        );
    }

    #[test]
    fn change_pin_keeps_everything_verbatim() {
        assert_eq!(extract_new_pin("0000*99*12*34"), Some("12*34"));
        assert_eq!(extract_new_pin("0000*99*"), Some(""));
    }

    #[test]
    fn change_pin_without_second_separator() {
        assert_eq!(resolve(99, "0000*99"), Action::ChangePin { new_pin: None });
    }

    #[test]
    fn table_codes_are_unique() {
        for (i, (a, _)) in COMMAND_TABLE.iter().enumerate() {
            for (b, _) in &COMMAND_TABLE[i + 1..] {
                assert_ne!(a, b);
            }
            assert_ne!(*a, CMD_CHANGE_PIN);
        }
    }
}
