//! Human-readable uptime.

use core::fmt::Write;

const MS_PER_SECOND: u64 = 1_000;

/// Format a millisecond uptime as `"<d> days, <h> hours, <m> minutes, <s> seconds"`.
///
/// Leading zero units are dropped; once a unit is shown every smaller unit
/// follows it.  Seconds are always present.  A unit is singular only when
/// its value is exactly 1.
pub fn format_uptime(uptime_ms: u64) -> String {
    let total_secs = uptime_ms / MS_PER_SECOND;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = (total_secs / 3_600) % 24;
    let days = total_secs / 86_400;

    let mut out = String::new();
    let mut shown = false;
    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        shown |= value > 0;
        if shown {
            push_unit(&mut out, value, unit);
            out.push_str(", ");
        }
    }
    push_unit(&mut out, seconds, "second");
    out
}

fn push_unit(out: &mut String, value: u64, unit: &str) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{value} {unit}");
    if value != 1 {
        out.push('s');
    }
}
