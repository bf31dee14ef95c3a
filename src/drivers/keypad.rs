//! 4×3 matrix keypad scanner over `embedded-hal` digital pins.
//!
//! Rows are outputs idling HIGH; a scan drives each row LOW in turn and reads
//! the pulled-up columns.  A LOW column means the key at (row, col) is down.
//! [`MatrixKeypad::poll`] debounces the raw scan and reports a key once, on
//! the press edge.  Only one key is reported per scan; the first hit wins.

use core::fmt;

use embedded_hal::digital::{Error as _, ErrorKind, InputPin, OutputPin};

use crate::keypad::KEYMAP;

pub const ROWS: usize = 4;
pub const COLS: usize = 3;

/// Default settle time before a raw reading is trusted.
pub const DEBOUNCE_MS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadError {
    Row(ErrorKind),
    Col(ErrorKind),
}

impl fmt::Display for KeypadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(kind) => write!(f, "keypad row pin error: {kind:?}"),
            Self::Col(kind) => write!(f, "keypad column pin error: {kind:?}"),
        }
    }
}

impl std::error::Error for KeypadError {}

pub struct MatrixKeypad<R, C> {
    rows: [R; ROWS],
    cols: [C; COLS],
    candidate: Option<char>,
    candidate_since_ms: u64,
    stable: Option<char>,
}

impl<R: OutputPin, C: InputPin> MatrixKeypad<R, C> {
    /// Take ownership of the pins and park every row HIGH.
    pub fn new(rows: [R; ROWS], cols: [C; COLS]) -> Result<Self, KeypadError> {
        let mut keypad = Self {
            rows,
            cols,
            candidate: None,
            candidate_since_ms: 0,
            stable: None,
        };
        for row in &mut keypad.rows {
            row.set_high().map_err(|e| KeypadError::Row(e.kind()))?;
        }
        Ok(keypad)
    }

    /// Raw, undebounced scan.
    pub fn scan(&mut self) -> Result<Option<char>, KeypadError> {
        let mut hit = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low().map_err(|e| KeypadError::Row(e.kind()))?;
            for (c, col) in self.cols.iter_mut().enumerate() {
                if hit.is_none() && col.is_low().map_err(|e| KeypadError::Col(e.kind()))? {
                    hit = Some(KEYMAP[r][c]);
                }
            }
            row.set_high().map_err(|e| KeypadError::Row(e.kind()))?;
        }
        Ok(hit)
    }

    /// Debounced press edge: `Some(key)` once per physical press.
    pub fn poll(&mut self, now_ms: u64) -> Result<Option<char>, KeypadError> {
        let raw = self.scan()?;
        if raw != self.candidate {
            self.candidate = raw;
            self.candidate_since_ms = now_ms;
            return Ok(None);
        }
        if self.stable == self.candidate
            || now_ms.saturating_sub(self.candidate_since_ms) < u64::from(DEBOUNCE_MS)
        {
            return Ok(None);
        }
        self.stable = self.candidate;
        Ok(self.stable)
    }
}
