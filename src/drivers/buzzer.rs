//! Piezo buzzer playing [`Tone`] melodies.
//!
//! Playback is blocking: each note retunes the LEDC buzzer timer, waits its
//! duration and falls silent.  Host builds record what would have been played.

use heapless::HistoryBuffer;
use log::trace;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::hw_init;
use crate::tones::Tone;

#[derive(Debug, Default)]
pub struct Buzzer {
    played: HistoryBuffer<Tone, PLAY_HISTORY>,
}

/// Most recent tones kept for inspection.
pub const PLAY_HISTORY: usize = 16;

impl Buzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, tone: Tone) {
        self.played.write(tone);
        trace!("TONE | {:?} ({} ms)", tone, tone.duration_ms());
        for note in tone.melody() {
            if note.is_rest() {
                hw_init::buzzer_silence();
            } else {
                hw_init::buzzer_tone(note.freq_hz);
            }
            hw_init::delay_ms(u32::from(note.duration_ms));
        }
        hw_init::buzzer_silence();
    }

    /// Tones requested since the last call, oldest first.
    pub fn take_played(&mut self) -> Vec<Tone> {
        let tones = self.played.oldest_ordered().copied().collect();
        self.played.clear();
        tones
    }
}

impl EventSink for Buzzer {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Tone(tone) = event {
            self.play(*tone);
        }
    }
}
