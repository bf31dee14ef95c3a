//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event as a tagged
//! line to the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => info!("START | initial_state={}", state),
            AppEvent::KeyPressed { echo } => info!("KEY | {}", echo),
            AppEvent::EntryCleared => info!("KEY | entry cleared"),
            AppEvent::StateChanged {
                state,
                acknowledged,
            } => info!(
                "STATE | {} ({}) ack={}",
                state,
                state.label(),
                acknowledged
            ),
            AppEvent::CapabilityPushed(state) => {
                info!("BRIDGE | capability state={}", state.code());
            }
            AppEvent::TriggerFired(name) => info!("BRIDGE | trigger {}", name),
            AppEvent::StateRequested => info!("BRIDGE | state requested"),
            AppEvent::Tone(tone) => info!("TONE | {:?} ({} ms)", tone, tone.duration_ms()),
            AppEvent::InfoRequested => info!("INFO | screen requested"),
            AppEvent::RestartRequested => warn!("SYSTEM | restart requested"),
            AppEvent::PinChanged => info!("PIN | changed"),
            AppEvent::Rejected(why) => warn!("REJECT | {}", why),
        }
    }
}
