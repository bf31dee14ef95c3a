//! Buzzer melodies.
//!
//! A [`Melody`] is a static slice of [`Note`]s played back-to-back by the
//! buzzer driver.  Playback blocks the control loop for the sum of the note
//! durations; keypad input is not captured meanwhile.

/// One note: frequency in Hz (`0` = rest) and duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

impl Note {
    pub const fn new(freq_hz: u16, duration_ms: u16) -> Self {
        Self { freq_hz, duration_ms }
    }

    pub const fn rest(duration_ms: u16) -> Self {
        Self { freq_hz: 0, duration_ms }
    }

    pub const fn is_rest(&self) -> bool {
        self.freq_hz == 0
    }
}

pub type Melody = &'static [Note];

// Equal-tempered pitches, rounded to the nearest Hz.
pub const NOTE_A2: u16 = 110;
pub const NOTE_B3: u16 = 247;
pub const NOTE_C4: u16 = 262;
pub const NOTE_D4: u16 = 294;
pub const NOTE_E4: u16 = 330;
pub const NOTE_G4: u16 = 392;
pub const NOTE_A4: u16 = 440;
pub const NOTE_B4: u16 = 494;
pub const NOTE_C5: u16 = 523;
pub const NOTE_D5: u16 = 587;
pub const NOTE_E5: u16 = 659;
pub const NOTE_F5: u16 = 698;
pub const NOTE_G5: u16 = 784;

/// Named sound cues the application core asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Short click on every key press.
    KeyBeep,
    /// Command accepted.
    Success,
    /// External state change received.
    Acknowledge,
    /// Wrong PIN or unknown command.
    Error,
    /// Code 1990.
    EasterEgg,
}

impl Tone {
    pub fn melody(self) -> Melody {
        match self {
            Self::KeyBeep => KEY_BEEP,
            Self::Success => SUCCESS,
            Self::Acknowledge => ACKNOWLEDGE,
            Self::Error => ERROR,
            Self::EasterEgg => EASTER_EGG,
        }
    }

    /// Total blocking time of the melody.
    pub fn duration_ms(self) -> u32 {
        self.melody().iter().map(|n| n.duration_ms as u32).sum()
    }
}

const KEY_BEEP: Melody = &[Note::new(NOTE_B3, 50)];

const SUCCESS: Melody = &[
    Note::new(NOTE_C5, 100),
    Note::new(NOTE_D5, 100),
    Note::new(NOTE_F5, 100),
    Note::new(NOTE_G5, 100),
];

const ACKNOWLEDGE: Melody = &[Note::new(NOTE_G5, 150), Note::new(NOTE_F5, 200)];

const ERROR: Melody = &[Note::new(NOTE_A2, 500)];

// Opening bars of the Monkey Island theme.
const EASTER_EGG: Melody = &[
    Note::new(NOTE_E4, 250),
    Note::rest(125),
    Note::new(NOTE_E4, 125),
    Note::new(NOTE_G4, 125),
    Note::new(NOTE_D4, 125),
    Note::new(NOTE_C4, 250),
    Note::new(NOTE_B3, 125),
    Note::new(NOTE_C4, 125),
    Note::new(NOTE_D4, 125),
    Note::new(NOTE_E4, 500),
    Note::rest(125),
    Note::new(NOTE_A4, 250),
    Note::new(NOTE_B4, 125),
    Note::new(NOTE_C5, 125),
    Note::new(NOTE_B4, 125),
    Note::new(NOTE_A4, 125),
    Note::new(NOTE_G4, 250),
    Note::new(NOTE_E5, 375),
    Note::new(NOTE_D5, 125),
    Note::new(NOTE_C5, 500),
];
