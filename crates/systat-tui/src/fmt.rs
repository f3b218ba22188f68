//! Human-readable formatting for table cells.

use bytesize::ByteSize;
use chrono::{DateTime, Utc};

/// Binary-unit size, e.g. "1.5 GiB".
pub fn fmt_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string_as(true)
}

pub fn fmt_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Compact age, e.g. "47d", "4h 23m", "12m".
pub fn fmt_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = u64::try_from((now - created).num_seconds()).unwrap_or(0);
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Status glyph for a health entry; `None` is still pending.
pub fn health_glyph(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "🟢",
        Some(false) => "🔴",
        None => "◌",
    }
}
