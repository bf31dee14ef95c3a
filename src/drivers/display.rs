//! What the 84×48 panel should show, independent of the panel itself.
//!
//! [`DisplayModel`] listens to application events and keeps a small screen
//! state machine.  Each loop iteration the binary asks whether anything
//! changed and, if so, renders [`DisplayModel::frame`] onto a [`TextPanel`].
//!
//! ```text
//!   Boot ──▶ Connecting{n} ──▶ State ◀──▶ Info (for info_screen_ms)
//! ```
//!
//! While the info screen is up, state changes are recorded but not shown;
//! the state screen comes back with the latest state once it expires.

use core::fmt;

use crate::alarm::AlarmState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::diagnostics::InfoScreen;

pub const WIDTH: u8 = 84;
pub const HEIGHT: u8 = 48;
/// Glyph advance in pixels (5 px glyph + 1 px gap).
pub const CHAR_WIDTH: u8 = 6;
pub const LINE_HEIGHT: u8 = 8;
/// Characters that fit on one line.
pub const LINE_CHARS: usize = (WIDTH / CHAR_WIDTH) as usize;

/// Baseline row of the centred state label.
pub const STATE_LABEL_Y: u8 = 15;
/// Row where key echoes are printed.
pub const ENTRY_Y: u8 = 35;

/// One string placed at a pixel position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub x: u8,
    pub y: u8,
    pub text: String,
}

impl TextItem {
    fn at(x: u8, y: u8, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    Bus,
    Pin,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "display bus write failed"),
            Self::Pin => write!(f, "display control pin failed"),
        }
    }
}

impl std::error::Error for DisplayError {}

/// A monochrome text surface.
pub trait TextPanel {
    /// Replace the whole panel content with `frame`.
    fn show(&mut self, frame: &[TextItem]) -> Result<(), DisplayError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Boot,
    Connecting { attempt: u16 },
    State,
    Info { until_ms: u64, lines: [String; 6] },
}

pub struct DisplayModel {
    screen: Screen,
    state: AlarmState,
    entry: String,
    ip: Option<String>,
    info_screen_ms: u32,
    now_ms: u64,
    dirty: bool,
}

impl DisplayModel {
    pub fn new(info_screen_ms: u32) -> Self {
        Self {
            screen: Screen::Boot,
            state: AlarmState::Unknown,
            entry: String::new(),
            ip: None,
            info_screen_ms,
            now_ms: 0,
            dirty: true,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn shown_state(&self) -> AlarmState {
        self.state
    }

    /// Echo characters currently on the entry row.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn set_connecting(&mut self, attempt: u16) {
        self.screen = Screen::Connecting { attempt };
        self.dirty = true;
    }

    pub fn set_ip(&mut self, ip: Option<String>) {
        self.ip = ip;
    }

    /// Expire the info screen.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if let Screen::Info { until_ms, .. } = self.screen {
            if now_ms >= until_ms {
                self.screen = Screen::State;
                self.dirty = true;
            }
        }
    }

    /// `true` once per change; the caller redraws.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    pub fn frame(&self) -> Vec<TextItem> {
        match &self.screen {
            Screen::Boot => vec![TextItem::at(0, 0, "Booting")],
            Screen::Connecting { attempt } => {
                let dots = usize::from(*attempt).min(LINE_CHARS);
                vec![
                    TextItem::at(0, 0, "Connecting"),
                    TextItem::at(0, LINE_HEIGHT, ".".repeat(dots)),
                ]
            }
            Screen::State => {
                let mut items = vec![TextItem::at(
                    centred_x(self.state.label()),
                    STATE_LABEL_Y,
                    self.state.label(),
                )];
                if !self.entry.is_empty() {
                    items.push(TextItem::at(0, ENTRY_Y, self.entry.clone()));
                }
                items
            }
            Screen::Info { lines, .. } => lines
                .iter()
                .zip((0u8..).step_by(usize::from(LINE_HEIGHT)))
                .map(|(line, y)| TextItem::at(0, y, line.clone()))
                .collect(),
        }
    }

    fn push_echo(&mut self, echo: char) {
        if self.entry.chars().count() >= LINE_CHARS {
            self.entry.remove(0);
        }
        self.entry.push(echo);
    }
}

/// Left edge that centres `text` on the panel.
fn centred_x(text: &str) -> u8 {
    let width = text.chars().count() * usize::from(CHAR_WIDTH);
    (usize::from(WIDTH / 2)).saturating_sub(width / 2) as u8
}

impl EventSink for DisplayModel {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                self.state = *state;
                self.screen = Screen::State;
            }
            AppEvent::StateChanged { state, .. } => {
                // A state redraw starts from a blank panel.
                self.state = *state;
                self.entry.clear();
                if matches!(self.screen, Screen::Info { .. }) {
                    return;
                }
                self.screen = Screen::State;
            }
            AppEvent::KeyPressed { echo } => {
                self.push_echo(*echo);
                if matches!(self.screen, Screen::Info { .. }) {
                    return;
                }
            }
            AppEvent::EntryCleared => self.entry.clear(),
            AppEvent::InfoRequested => {
                let info = InfoScreen::capture(self.ip.clone(), self.now_ms);
                self.screen = Screen::Info {
                    until_ms: self.now_ms + u64::from(self.info_screen_ms),
                    lines: info.lines(),
                };
            }
            _ => return,
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_state(state: AlarmState) -> DisplayModel {
        let mut d = DisplayModel::new(5_000);
        d.emit(&AppEvent::Started(state));
        d.take_dirty();
        d
    }

    #[test]
    fn boot_then_connecting() {
        let mut d = DisplayModel::new(5_000);
        assert!(d.take_dirty());
        assert_eq!(d.frame(), vec![TextItem::at(0, 0, "Booting")]);
        d.set_connecting(3);
        assert!(d.take_dirty());
        assert_eq!(d.frame()[1].text, "...");
    }

    #[test]
    fn state_label_is_centred() {
        let d = on_state(AlarmState::Home);
        // "THUIS" is 30 px wide.
        assert_eq!(d.frame(), vec![TextItem::at(27, 15, "THUIS")]);
    }

    #[test]
    fn echoes_accumulate_and_clear() {
        let mut d = on_state(AlarmState::Home);
        for c in ['*', '*', '*', '*', '*', '1'] {
            d.emit(&AppEvent::KeyPressed { echo: c });
        }
        assert!(d.take_dirty());
        assert_eq!(d.frame()[1], TextItem::at(0, ENTRY_Y, "*****1"));
        d.emit(&AppEvent::EntryCleared);
        assert_eq!(d.frame().len(), 1);
    }

    #[test]
    fn state_redraw_wipes_entry_row() {
        let mut d = on_state(AlarmState::Home);
        for c in ['*', '*', '*'] {
            d.emit(&AppEvent::KeyPressed { echo: c });
        }
        d.take_dirty();
        d.emit(&AppEvent::StateChanged {
            state: AlarmState::Away,
            acknowledged: true,
        });
        assert!(d.take_dirty());
        assert_eq!(d.entry(), "");
        assert_eq!(d.frame(), vec![TextItem::at(21, STATE_LABEL_Y, "AFWEZIG")]);
    }

    #[test]
    fn entry_row_keeps_tail() {
        let mut d = on_state(AlarmState::Home);
        for c in "0123456789abcdef".chars() {
            d.emit(&AppEvent::KeyPressed { echo: c });
        }
        assert_eq!(d.entry(), "23456789abcdef");
    }

    #[test]
    fn info_screen_holds_then_reverts_to_latest_state() {
        let mut d = on_state(AlarmState::Home);
        d.set_ip(Some("192.168.1.40".into()));
        d.tick(1_000);
        d.emit(&AppEvent::InfoRequested);
        assert!(matches!(d.screen(), Screen::Info { until_ms: 6_000, .. }));
        assert_eq!(d.frame()[1].text, "192.168.1.40");

        d.emit(&AppEvent::StateChanged {
            state: AlarmState::Away,
            acknowledged: true,
        });
        d.take_dirty();
        assert!(matches!(d.screen(), Screen::Info { .. }));
        assert!(!d.take_dirty());

        d.tick(5_999);
        assert!(!d.take_dirty());
        d.tick(6_000);
        assert!(d.take_dirty());
        assert_eq!(d.screen(), &Screen::State);
        assert_eq!(d.frame()[0].text, "AFWEZIG");
    }

    #[test]
    fn unrelated_events_do_not_redraw() {
        let mut d = on_state(AlarmState::Home);
        d.emit(&AppEvent::PinChanged);
        d.emit(&AppEvent::TriggerFired("setAlarmToHome"));
        assert!(!d.take_dirty());
    }
}
