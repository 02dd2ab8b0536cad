//! Time formatting helpers.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format a duration in seconds as its two most significant units.
///
/// Used in log lines for session durations: voting windows usually span
/// days, and `"2d"` reads better there than a raw second count. Zero
/// remainders are dropped, so exact multiples render as a single unit.
pub fn format_duration(secs: u64) -> String {
    let (major, major_unit, rem, minor_unit) = if secs >= DAY {
        (secs / DAY, "d", (secs % DAY) / HOUR, "h")
    } else if secs >= HOUR {
        (secs / HOUR, "h", (secs % HOUR) / MINUTE, "m")
    } else if secs >= MINUTE {
        (secs / MINUTE, "m", secs % MINUTE, "s")
    } else {
        return format!("{secs}s");
    };

    if rem == 0 {
        format!("{major}{major_unit}")
    } else {
        format!("{major}{major_unit} {rem}{minor_unit}")
    }
}
