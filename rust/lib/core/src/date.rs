//! Date parsing and pt-BR rendering.
//!
//! None of these functions fail. Absent input and unparseable input map
//! to fixed sentinel strings; the past-event check treats both as "not
//! past" so an event with a broken end date stays visible.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime, Offset, SecondsFormat, Utc};

pub const DATE_UNAVAILABLE: &str = "Data não disponível";
pub const INVALID_DATE: &str = "Data inválida";

/// Rendering patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `15 de março, 2024 às 14:30`
    Long,
    /// `15 de março, 2024`
    DateOnly,
}

impl DatePattern {
    fn strftime(&self) -> &'static str {
        match self {
            DatePattern::Long => "%-d de %B, %Y às %H:%M",
            DatePattern::DateOnly => "%-d de %B, %Y",
        }
    }
}

/// UTC-03:00, the offset the venues operate in.
pub fn brasilia() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
}

/// Parse a timestamp the way the API and the forms produce them.
///
/// Accepts RFC 3339, offset-less `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as
/// UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    to_iso_string(&Utc::now())
}

fn present(date: Option<&str>) -> Option<&str> {
    date.filter(|s| !s.trim().is_empty())
}

/// Render `date` with `pattern` at `offset`.
pub fn format_date_at(date: Option<&str>, pattern: DatePattern, offset: FixedOffset) -> String {
    let Some(raw) = present(date) else {
        return DATE_UNAVAILABLE.to_string();
    };
    let Some(instant) = parse_instant(raw) else {
        return INVALID_DATE.to_string();
    };

    let local = instant.with_timezone(&offset);
    let mut out = String::new();
    if write!(out, "{}", local.format_localized(pattern.strftime(), Locale::pt_BR)).is_err() {
        tracing::error!(date = raw, "date formatting failed");
        return INVALID_DATE.to_string();
    }
    out
}

/// Long form in UTC: `15 de março, 2024 às 14:30`.
pub fn format_date(date: Option<&str>) -> String {
    format_date_at(date, DatePattern::Long, Utc.fix())
}

/// Date without time, in UTC.
pub fn format_date_only(date: Option<&str>) -> String {
    format_date_at(date, DatePattern::DateOnly, Utc.fix())
}

pub fn is_valid_date(date: Option<&str>) -> bool {
    present(date).and_then(parse_instant).is_some()
}

/// Whether an event ending at `end_date` is over relative to `now`.
pub fn is_event_past_at(end_date: Option<&str>, now: DateTime<Utc>) -> bool {
    present(end_date)
        .and_then(parse_instant)
        .is_some_and(|end| end < now)
}

pub fn is_event_past(end_date: Option<&str>) -> bool {
    is_event_past_at(end_date, Utc::now())
}
