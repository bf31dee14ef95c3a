//! Keypad command pipeline.
//!
//! ```text
//!  key ──▶ KeyBuffer ──[#]──▶ PinGate ──[ok]──▶ decode ──▶ Action
//!                                 │
//!                              [reject] ──▶ error tone + redraw
//! ```
//!
//! Grammar: `(digit | '*')* '#'`.  The first `*` separates the PIN from the
//! command digits; a second `*` introduces the new PIN for code 99.  There is
//! no escape, so PINs cannot contain `*` or `#`.

pub mod buffer;
pub mod decoder;
pub mod dispatch;
pub mod pin_gate;

/// Separates PIN from command digits.
pub const SEPARATOR: char = '*';
/// Submits the accumulated command.
pub const TERMINATOR: char = '#';

/// Keys on the 4×3 matrix, row-major.
pub const KEYMAP: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    [SEPARATOR, '0', TERMINATOR],
];
