//! `H:MM:SS` text format for durations.
//!
//! Grace periods, lateness thresholds and deduction lengths are written in
//! configuration files and API payloads as `H:MM:SS` (e.g. `0:05:01`). Use the
//! module with `#[serde(with = "hms")]`, or `hms::option` for optional fields.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serializer, de};

/// Formats a duration as `H:MM:SS`, prefixed with `-` when negative.
///
/// Sub-second precision is truncated.
///
/// ```
/// use attendance_ledger::models::hms;
/// use chrono::Duration;
///
/// assert_eq!(hms::format(&Duration::seconds(301)), "0:05:01");
/// assert_eq!(hms::format(&Duration::hours(26)), "26:00:00");
/// assert_eq!(hms::format(&Duration::minutes(-5)), "-0:05:00");
/// ```
pub fn format(duration: &Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Parses `H:MM:SS` (or `-H:MM:SS`) into a duration.
///
/// Minutes and seconds must be below 60. Returns `None` for anything else.
///
/// ```
/// use attendance_ledger::models::hms;
/// use chrono::Duration;
///
/// assert_eq!(hms::parse("0:05:01"), Some(Duration::seconds(301)));
/// assert_eq!(hms::parse("-1:00:00"), Some(Duration::hours(-1)));
/// assert_eq!(hms::parse("0:60:00"), None);
/// ```
pub fn parse(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = body.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    let total = hours.checked_mul(3600)? + minutes * 60 + seconds;
    let duration = Duration::try_seconds(total)?;
    Some(if negative { -duration } else { duration })
}

/// Serializes a duration as `H:MM:SS`.
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(duration))
}

/// Deserializes a duration from `H:MM:SS`.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).ok_or_else(|| {
        de::Error::custom(format!("invalid duration '{}', expected H:MM:SS", text))
    })
}

/// `H:MM:SS` format for `Option<Duration>` fields.
pub mod option {
    use super::*;

    /// Serializes an optional duration as `H:MM:SS` or `null`.
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(d) => serializer.serialize_some(&format(d)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional duration from `H:MM:SS` or `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text).map(Some).ok_or_else(|| {
                de::Error::custom(format!("invalid duration '{}', expected H:MM:SS", text))
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super")]
        grace: Duration,
        #[serde(with = "super::option", default)]
        lateness: Option<Duration>,
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("5"), None);
        assert_eq!(parse("0:05"), None);
        assert_eq!(parse("0:05:00:00"), None);
        assert_eq!(parse("0:05:60"), None);
        assert_eq!(parse("a:05:00"), None);
    }

    #[test]
    fn test_parse_accepts_leading_zero_hours() {
        assert_eq!(parse("00:15:00"), Some(Duration::minutes(15)));
        assert_eq!(parse(" 2:00:00 "), Some(Duration::hours(2)));
    }

    #[test]
    fn test_format_truncates_subseconds() {
        let duration = Duration::milliseconds(90_500);
        assert_eq!(format(&duration), "0:01:30");
    }

    #[test]
    fn test_wrapper_deserializes_from_json() {
        let json = r#"{"grace": "0:05:00", "lateness": "0:10:00"}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.grace, Duration::minutes(5));
        assert_eq!(wrapper.lateness, Some(Duration::minutes(10)));
    }

    #[test]
    fn test_wrapper_null_and_missing_optional() {
        let wrapper: Wrapper = serde_json::from_str(r#"{"grace": "0:00:00", "lateness": null}"#).unwrap();
        assert_eq!(wrapper.lateness, None);

        let wrapper: Wrapper = serde_json::from_str(r#"{"grace": "0:00:00"}"#).unwrap();
        assert_eq!(wrapper.lateness, None);
    }

    #[test]
    fn test_wrapper_rejects_bad_duration() {
        let result: Result<Wrapper, _> = serde_json::from_str(r#"{"grace": "five minutes"}"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("expected H:MM:SS"), "{}", message);
    }

    #[test]
    fn test_wrapper_serializes_as_text() {
        let wrapper = Wrapper {
            grace: Duration::minutes(5),
            lateness: None,
        };
        let json = serde_json::to_value(&wrapper).unwrap();
        assert_eq!(json["grace"], "0:05:00");
        assert!(json["lateness"].is_null());
    }
}
