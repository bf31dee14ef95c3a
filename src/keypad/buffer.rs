//! Key accumulation.

use super::{SEPARATOR, TERMINATOR};

/// What a single key press produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Character to echo on the entry line (`*` while the entry is hidden).
    pub echo: char,
    /// The full command, when the key was the terminator.
    pub submitted: Option<String>,
}

/// Accumulates key presses into the pending command.
///
/// Digits typed before the first separator are echoed masked; after it they
/// are echoed in the clear.  The terminator hands the command out and resets
/// both the buffer and the masking.
#[derive(Debug, Clone)]
pub struct KeyBuffer {
    pending: String,
    reveal: bool,
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBuffer {
    pub fn new() -> Self {
        Self {
            pending: String::new(),
            reveal: false,
        }
    }

    pub fn on_key(&mut self, key: char) -> KeyOutcome {
        let echo = if self.reveal { key } else { '*' };

        if key == TERMINATOR {
            let submitted = core::mem::take(&mut self.pending);
            self.reveal = false;
            return KeyOutcome {
                echo,
                submitted: Some(submitted),
            };
        }

        if key == SEPARATOR {
            self.reveal = true;
        }
        self.pending.push(key);

        KeyOutcome {
            echo,
            submitted: None,
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Whether digits are currently echoed in the clear.
    pub fn is_revealed(&self) -> bool {
        self.reveal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buf: &mut KeyBuffer, keys: &str) -> Vec<KeyOutcome> {
        keys.chars().map(|k| buf.on_key(k)).collect()
    }

    #[test]
    fn terminator_submits_without_itself() {
        let mut buf = KeyBuffer::new();
        let out = feed(&mut buf, "1234*1#");
        assert_eq!(out.last().unwrap().submitted.as_deref(), Some("1234*1"));
        assert!(out[..out.len() - 1].iter().all(|o| o.submitted.is_none()));
        assert_eq!(buf.pending(), "");
    }

    #[test]
    fn pin_is_masked_until_separator() {
        let mut buf = KeyBuffer::new();
        let echoes: String = feed(&mut buf, "1234*12").iter().map(|o| o.echo).collect();
        assert_eq!(echoes, "*****12");
    }

    #[test]
    fn terminator_resets_masking() {
        let mut buf = KeyBuffer::new();
        feed(&mut buf, "0000*1#");
        assert!(!buf.is_revealed());
        assert_eq!(buf.on_key('5').echo, '*');
    }

    #[test]
    fn empty_submission() {
        let mut buf = KeyBuffer::new();
        assert_eq!(buf.on_key('#').submitted.as_deref(), Some(""));
    }

    #[test]
    fn long_entry_is_not_truncated() {
        let mut buf = KeyBuffer::new();
        let digits = "9".repeat(200);
        feed(&mut buf, &digits);
        assert_eq!(buf.pending().len(), 200);
    }

    #[test]
    fn second_separator_is_kept() {
        let mut buf = KeyBuffer::new();
        let out = feed(&mut buf, "0000*99*1234#");
        assert_eq!(out.last().unwrap().submitted.as_deref(), Some("0000*99*1234"));
    }
}
