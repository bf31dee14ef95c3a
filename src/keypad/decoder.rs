//! Command code decoding.

/// Decode the command code that follows the PIN.
///
/// A missing or empty remainder decodes to `0` (Home).  Otherwise the leading
/// run of ASCII digits is read; anything from the first non-digit on is
/// ignored, and a remainder with no leading digit decodes to `0`.  Overlong
/// digit runs saturate at `u32::MAX`, which no command uses.
pub fn decode(rest: Option<&str>) -> u32 {
    let Some(rest) = rest else {
        return 0;
    };

    rest.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}
