//! Property value types (RFC 5545 §3.3).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{DateTime, Duration, RRule, UtcOffset};

/// DATE value (RFC 5545 §3.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub NaiveDate);

impl Date {
    /// Midnight at the start of this date.
    #[must_use]
    pub fn at_midnight(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// A value that may be written either as DATE or as DATE-TIME
/// (DTSTART, DUE, RECURRENCE-ID, EXDATE, RDATE).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateOrDateTime {
    Date(Date),
    DateTime(DateTime),
}

impl DateOrDateTime {
    /// Wall-clock fields; a DATE maps to midnight.
    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.at_midnight(),
            Self::DateTime(dt) => dt.local,
        }
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match self {
            Self::Date(_) => None,
            Self::DateTime(dt) => dt.tzid(),
        }
    }

    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self, Self::DateTime(dt) if dt.is_utc())
    }
}

impl fmt::Display for DateOrDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => d.fmt(f),
            Self::DateTime(dt) => dt.fmt(f),
        }
    }
}

/// PERIOD value (RFC 5545 §3.3.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Explicit { start: DateTime, end: DateTime },
    Duration { start: DateTime, duration: Duration },
}

impl Period {
    #[must_use]
    pub fn start(&self) -> &DateTime {
        match self {
            Self::Explicit { start, .. } | Self::Duration { start, .. } => start,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit { start, end } => write!(f, "{start}/{end}"),
            Self::Duration { start, duration } => write!(f, "{start}/{duration}"),
        }
    }
}

/// Parsed property value.
///
/// The raw text is kept next to it on [`super::Property`] so unknown or
/// unparsed values survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    /// CAL-ADDRESS, typically a `mailto:` URI.
    CalAddress(String),
    Date(Date),
    DateList(Vec<Date>),
    DateTime(DateTime),
    DateTimeList(Vec<DateTime>),
    Duration(Duration),
    Float(f64),
    Integer(i32),
    Period(Period),
    PeriodList(Vec<Period>),
    Recur(Box<RRule>),
    /// TEXT value (unescaped).
    Text(String),
    /// Comma-separated TEXT values (unescaped).
    TextList(Vec<String>),
    Uri(String),
    UtcOffset(UtcOffset),
    /// Unknown or unparsed value, written back verbatim.
    Unknown(String),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the URI or calendar address carried by this value.
    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(s) | Self::CalAddress(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_duration(&self) -> Option<&Duration> {
        match self {
            Self::Duration(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_recur(&self) -> Option<&RRule> {
        match self {
            Self::Recur(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_utc_offset(&self) -> Option<UtcOffset> {
        match self {
            Self::UtcOffset(o) => Some(*o),
            _ => None,
        }
    }

    /// Flattens every date-like value (single, list or period starts).
    #[must_use]
    pub fn date_values(&self) -> Vec<DateOrDateTime> {
        match self {
            Self::Date(d) => vec![DateOrDateTime::Date(*d)],
            Self::DateList(ds) => ds.iter().copied().map(DateOrDateTime::Date).collect(),
            Self::DateTime(dt) => vec![DateOrDateTime::DateTime(dt.clone())],
            Self::DateTimeList(dts) => dts.iter().cloned().map(DateOrDateTime::DateTime).collect(),
            Self::Period(p) => vec![DateOrDateTime::DateTime(p.start().clone())],
            Self::PeriodList(ps) => ps
                .iter()
                .map(|p| DateOrDateTime::DateTime(p.start().clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the text items of a TEXT or TEXT-LIST value.
    #[must_use]
    pub fn text_values(&self) -> Vec<&str> {
        match self {
            Self::Text(s) => vec![s.as_str()],
            Self::TextList(list) => list.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_display() {
        assert_eq!(Date(day(2026, 1, 23)).to_string(), "20260123");
    }

    #[test]
    fn period_display() {
        let start = DateTime::utc(day(2026, 1, 23).and_hms_opt(9, 0, 0).unwrap());
        let end = DateTime::utc(day(2026, 1, 23).and_hms_opt(17, 0, 0).unwrap());
        let explicit = Period::Explicit {
            start: start.clone(),
            end,
        };
        assert_eq!(explicit.to_string(), "20260123T090000Z/20260123T170000Z");

        let by_duration = Period::Duration {
            start,
            duration: Duration::dhms(0, 8, 0, 0),
        };
        assert_eq!(by_duration.to_string(), "20260123T090000Z/PT8H");
    }

    #[test]
    fn date_values_flatten_lists() {
        let value = Value::DateList(vec![Date(day(2026, 1, 1)), Date(day(2026, 1, 2))]);
        let values = value.date_values();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(DateOrDateTime::is_date));
        assert_eq!(values[1].naive(), day(2026, 1, 2).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn text_values() {
        let value = Value::TextList(vec!["a".into(), "b".into()]);
        assert_eq!(value.text_values(), vec!["a", "b"]);
        assert!(Value::Integer(1).text_values().is_empty());
    }
}
