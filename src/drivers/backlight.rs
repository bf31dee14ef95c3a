//! Display backlight with inactivity timeout.

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::hw_init;
use crate::drivers::led::PwmLed;

pub struct Backlight {
    led: PwmLed,
    timeout_ms: u32,
    last_activity_ms: u64,
    now_ms: u64,
    on: bool,
}

impl Backlight {
    pub fn new(timeout_ms: u32, brightness: u8) -> Self {
        let mut led = PwmLed::new(hw_init::LEDC_CH_BACKLIGHT, 0);
        led.set_brightness(brightness);
        Self {
            led,
            timeout_ms,
            last_activity_ms: 0,
            now_ms: 0,
            on: false,
        }
    }

    /// Start dark with the idle timer at `now_ms`.
    pub fn begin(&mut self, now_ms: u64) {
        self.led.off();
        self.on = false;
        self.now_ms = now_ms;
        self.last_activity_ms = now_ms;
    }

    pub fn register_activity(&mut self) {
        self.last_activity_ms = self.now_ms;
        if !self.on {
            self.led.on();
            self.on = true;
        }
    }

    /// Switch off once the idle timeout has passed.
    pub fn update(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if self.on && now_ms.saturating_sub(self.last_activity_ms) >= u64::from(self.timeout_ms) {
            self.led.off();
            self.on = false;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Key presses and state changes wake the backlight.
impl EventSink for Backlight {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(
            event,
            AppEvent::KeyPressed { .. } | AppEvent::StateChanged { .. } | AppEvent::InfoRequested
        ) {
            self.register_activity();
        }
    }
}
