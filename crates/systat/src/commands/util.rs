//! Cell formatting shared by the table views.

use bytesize::ByteSize;
use chrono::{DateTime, SecondsFormat, Utc};

pub fn fmt_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string_as(true)
}

pub fn fmt_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

pub fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "-".to_owned(), |t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(or_dash(None::<u32>), "-");
        assert_eq!(or_dash(Some(7)), "7");
        assert_eq!(fmt_time(None), "-");
    }

    #[test]
    fn times_are_rfc3339() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        assert_eq!(fmt_time(t), "2024-05-01T12:00:00Z");
    }
}
