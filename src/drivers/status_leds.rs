//! Red / orange / green alarm-state indicator.
//!
//! | state          | LED    |
//! |----------------|--------|
//! | Away, Sleep    | red    |
//! | Alert, Schedule| orange |
//! | anything else  | green  |
//!
//! Exactly one LED is active.  It is steady for locally set states and
//! flashes while the state awaits local confirmation.

use crate::alarm::AlarmState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::hw_init;
use crate::drivers::led::PwmLed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Red,
    Orange,
    Green,
}

impl Indicator {
    pub fn for_state(state: AlarmState) -> Self {
        match state {
            AlarmState::Away | AlarmState::Sleep => Self::Red,
            AlarmState::Alert | AlarmState::Schedule => Self::Orange,
            AlarmState::Home | AlarmState::Disarmed | AlarmState::Unknown => Self::Green,
        }
    }
}

pub struct StatusLeds {
    red: PwmLed,
    orange: PwmLed,
    green: PwmLed,
    active: Option<Indicator>,
    now_ms: u64,
}

impl StatusLeds {
    pub fn new(flash_interval_ms: u32, brightness: u8) -> Self {
        let mut leds = Self {
            red: PwmLed::new(hw_init::LEDC_CH_LED_RED, flash_interval_ms),
            orange: PwmLed::new(hw_init::LEDC_CH_LED_ORANGE, flash_interval_ms),
            green: PwmLed::new(hw_init::LEDC_CH_LED_GREEN, flash_interval_ms),
            active: None,
            now_ms: 0,
        };
        leds.set_brightness(brightness);
        leds
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.red.set_brightness(level);
        self.orange.set_brightness(level);
        self.green.set_brightness(level);
    }

    pub fn show(&mut self, state: AlarmState, acknowledged: bool) {
        self.red.off();
        self.orange.off();
        self.green.off();

        let indicator = Indicator::for_state(state);
        let now_ms = self.now_ms;
        let led = self.led_mut(indicator);
        if acknowledged {
            led.flash(now_ms);
        } else {
            led.on();
        }
        self.active = Some(indicator);
    }

    /// Advance flashing; call every loop iteration.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.red.tick(now_ms);
        self.orange.tick(now_ms);
        self.green.tick(now_ms);
    }

    pub fn active(&self) -> Option<Indicator> {
        self.active
    }

    pub fn led(&self, indicator: Indicator) -> &PwmLed {
        match indicator {
            Indicator::Red => &self.red,
            Indicator::Orange => &self.orange,
            Indicator::Green => &self.green,
        }
    }

    fn led_mut(&mut self, indicator: Indicator) -> &mut PwmLed {
        match indicator {
            Indicator::Red => &mut self.red,
            Indicator::Orange => &mut self.orange,
            Indicator::Green => &mut self.green,
        }
    }
}

impl EventSink for StatusLeds {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::StateChanged {
            state,
            acknowledged,
        } = event
        {
            self.show(*state, *acknowledged);
        }
    }
}
