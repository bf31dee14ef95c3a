//! Core events driving the host-side display, LEDs, backlight and buzzer.

use alarmkeypad::adapters::log_sink::LogEventSink;
use alarmkeypad::alarm::AlarmState;
use alarmkeypad::app::commands::AppCommand;
use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::ports::EventSink;
use alarmkeypad::app::service::AppService;
use alarmkeypad::config::KeypadConfig;
use alarmkeypad::drivers::backlight::Backlight;
use alarmkeypad::drivers::buzzer::Buzzer;
use alarmkeypad::drivers::display::{DisplayModel, ENTRY_Y, Screen};
use alarmkeypad::drivers::led::LedMode;
use alarmkeypad::drivers::status_leds::{Indicator, StatusLeds};
use alarmkeypad::tones::Tone;

use super::mock_hw::{MockPins, type_keys};

struct Panel {
    log: LogEventSink,
    display: DisplayModel,
    leds: StatusLeds,
    backlight: Backlight,
    buzzer: Buzzer,
}

impl Panel {
    fn new() -> Self {
        let cfg = KeypadConfig::default();
        let mut backlight = Backlight::new(cfg.backlight_timeout_ms, cfg.backlight_brightness);
        backlight.begin(0);
        Self {
            log: LogEventSink::new(),
            display: DisplayModel::new(cfg.info_screen_ms),
            leds: StatusLeds::new(cfg.led_flash_interval_ms, cfg.led_brightness),
            backlight,
            buzzer: Buzzer::new(),
        }
    }

    fn tick(&mut self, now_ms: u64) {
        self.display.tick(now_ms);
        self.leds.tick(now_ms);
        self.backlight.update(now_ms);
    }
}

impl EventSink for Panel {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        self.buzzer.emit(event);
        self.display.emit(event);
        self.leds.emit(event);
        self.backlight.emit(event);
    }
}

fn started() -> (AppService, Panel, MockPins) {
    let pins = MockPins::new();
    let mut app = AppService::new("0000");
    let mut panel = Panel::new();
    app.start(&mut panel);
    (app, panel, pins)
}

#[test]
fn boot_shows_home_in_green() {
    let (_, mut panel, _) = started();
    assert_eq!(panel.display.screen(), &Screen::State);
    assert_eq!(panel.display.frame()[0].text, "THUIS");
    assert_eq!(panel.leds.active(), Some(Indicator::Green));
    assert_eq!(panel.leds.led(Indicator::Green).mode(), LedMode::Steady);
    assert!(panel.display.take_dirty());
}

#[test]
fn masked_entry_then_cleared_on_submit() {
    let (mut app, mut panel, mut pins) = started();
    type_keys(&mut app, "0000*", &mut pins, &mut panel);
    assert_eq!(panel.display.entry(), "*****");
    assert!(panel.backlight.is_on());

    type_keys(&mut app, "2#", &mut pins, &mut panel);
    assert_eq!(panel.display.entry(), "");
    assert!(panel.display.frame().iter().all(|item| item.y != ENTRY_Y));
    assert_eq!(panel.display.frame()[0].text, "SLAPEN");
    assert_eq!(panel.leds.active(), Some(Indicator::Red));
}

#[test]
fn tones_play_in_order() {
    let (mut app, mut panel, mut pins) = started();
    type_keys(&mut app, "0000*1#", &mut pins, &mut panel);
    let played = panel.buzzer.take_played();
    assert_eq!(played.len(), 8);
    assert!(played[..7].iter().all(|t| *t == Tone::KeyBeep));
    assert_eq!(played[7], Tone::Success);
}

#[test]
fn external_push_flashes_indicator() {
    let (mut app, mut panel, mut pins) = started();
    app.handle_command(
        AppCommand::ExternalStateChange("schedule".into()),
        &mut pins,
        &mut panel,
    );
    assert_eq!(panel.leds.active(), Some(Indicator::Orange));
    assert_eq!(panel.leds.led(Indicator::Orange).mode(), LedMode::Flashing);
    assert_eq!(panel.buzzer.take_played(), vec![Tone::Acknowledge]);
    assert_eq!(panel.display.shown_state(), AlarmState::Schedule);
}

#[test]
fn info_screen_expires_back_to_state() {
    let (mut app, mut panel, mut pins) = started();
    panel.display.set_ip(Some("10.0.0.7".into()));
    panel.tick(2_000);
    type_keys(&mut app, "0000*77#", &mut pins, &mut panel);

    let frame = panel.display.frame();
    assert_eq!(frame[0].text, "IP address:");
    assert_eq!(frame[1].text, "10.0.0.7");
    assert_eq!(frame[2].text, "Build Date:");

    panel.tick(7_000);
    assert_eq!(panel.display.screen(), &Screen::State);
    assert_eq!(panel.display.frame()[0].text, "THUIS");
}

#[test]
fn backlight_times_out_without_keys() {
    let (mut app, mut panel, mut pins) = started();
    panel.tick(1_000);
    type_keys(&mut app, "1", &mut pins, &mut panel);
    assert!(panel.backlight.is_on());
    panel.tick(60_999);
    assert!(panel.backlight.is_on());
    panel.tick(61_000);
    assert!(!panel.backlight.is_on());
}
