use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

// ── Export timestamps ─────────────────────────────────────────────────────────

/// Naive date-time layouts accepted in export `date` fields, most common first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp strings found in chat exports.
///
/// Exports write local wall-clock time without an offset
/// (`"2024-01-15T10:00:00"`). Strings that do carry an offset keep their
/// wall-clock reading; nothing is converted between zones.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a JSON value holding an export timestamp.
    ///
    /// Only JSON strings are accepted; `null`, numbers and other shapes yield
    /// `None`.
    pub fn parse(value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::String(s) => Self::parse_str(s),
            _ => None,
        }
    }

    /// Parse a timestamp string, returning `None` for unrecognised formats.
    pub fn parse_str(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        // Offset-carrying forms keep their local reading.
        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.naive_local());
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }

        warn!("TimestampParser: could not parse timestamp string \"{}\"", s);
        None
    }
}

// ── CLI range bounds ──────────────────────────────────────────────────────────

/// Parse a user-supplied range bound.
///
/// Accepts a bare date (`2024-01-15`, meaning midnight at the start of that
/// day) or a date-time in any layout [`TimestampParser`] understands. Intended
/// as a `clap` value parser, hence the `String` error.
pub fn parse_range_bound(s: &str) -> Result<NaiveDateTime, String> {
    TimestampParser::parse_str(s).ok_or_else(|| {
        format!(
            "invalid date \"{}\": expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]",
            s
        )
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
