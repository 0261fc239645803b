//! Temporal codec: local and UTC date-times, durations.
//!
//! ## Summary
//! Every date-time field of the entity graph is either a [`LocalDateTime`]
//! (wall clock, no zone attached) or a [`UtcDateTime`] (an instant). A local
//! value keeps the fields of its input as written; an instant is always
//! converted to true UTC.

mod duration;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use jscal_core::constants::{LOCAL_DATE_TIME_FORMAT, UTC_TZID};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, ModelResult};

pub use duration::{Duration, decode_duration, encode_duration};

/// An instant, stored in UTC.
pub type UtcDateTime = DateTime<Utc>;

/// Raw input accepted by the normalizers.
#[derive(Debug, Clone, Copy)]
pub enum TemporalInput<'a> {
    /// Date-time text, with or without an offset suffix.
    Text(&'a str),
    /// An instant carrying an explicit offset.
    Instant(DateTime<FixedOffset>),
}

/// Wall-clock date-time without a zone.
///
/// Interpreted in the time zone declared by the owning object, or floating
/// when it declares none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    #[must_use]
    pub const fn new(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    /// Midnight at the start of `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }

    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// The wall-clock fields reinterpreted with offset zero.
    #[must_use]
    pub fn as_utc_encoded(&self) -> UtcDateTime {
        Utc.from_utc_datetime(&self.0)
    }

    /// Whether the time of day is exactly midnight.
    #[must_use]
    pub fn is_midnight(&self) -> bool {
        self.0.time() == chrono::NaiveTime::MIN
    }
}

impl From<NaiveDateTime> for LocalDateTime {
    fn from(naive: NaiveDateTime) -> Self {
        Self(naive)
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LOCAL_DATE_TIME_FORMAT))
    }
}

impl FromStr for LocalDateTime {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_local(TemporalInput::Text(s))
    }
}

impl Serialize for LocalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// ## Summary
/// Normalizes input into a local date-time.
///
/// Text is taken as written: an offset suffix (`Z`, `+02:00`) is stripped,
/// never applied. A bare date means midnight. An instant is converted to
/// UTC clock fields first.
///
/// ## Errors
/// Returns `InvalidTemporalInput` when the text is not a date-time.
pub fn normalize_local(input: TemporalInput<'_>) -> ModelResult<LocalDateTime> {
    match input {
        TemporalInput::Instant(instant) => Ok(LocalDateTime(instant.naive_utc())),
        TemporalInput::Text(text) => {
            let text = text.trim();
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME_FORMAT) {
                return Ok(LocalDateTime(naive));
            }
            if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
                return Ok(LocalDateTime(zoned.naive_local()));
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Ok(LocalDateTime::from_date(date));
            }
            Err(ModelError::temporal(format_args!(
                "not a local date-time: {text:?}"
            )))
        }
    }
}

/// ## Summary
/// Normalizes input into a UTC instant.
///
/// Offsets in text are applied. Text without an offset is read as UTC. An
/// absent input yields the current instant when `default_to_now` is set.
///
/// ## Errors
/// Returns `InvalidTemporalInput` when the text is not a date-time.
pub fn normalize_utc(
    input: Option<TemporalInput<'_>>,
    default_to_now: bool,
) -> ModelResult<Option<UtcDateTime>> {
    let Some(input) = input else {
        return Ok(default_to_now.then(Utc::now));
    };

    match input {
        TemporalInput::Instant(instant) => Ok(Some(instant.with_timezone(&Utc))),
        TemporalInput::Text(text) => {
            let text = text.trim();
            if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
                return Ok(Some(zoned.with_timezone(&Utc)));
            }
            NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME_FORMAT)
                .map(|naive| Some(Utc.from_utc_datetime(&naive)))
                .map_err(|e| ModelError::temporal(format_args!("{text:?}: {e}")))
        }
    }
}

/// ## Summary
/// Resolves a wall-clock time in an IANA time zone to a UTC instant.
///
/// Ambiguous times (a repeated hour) resolve to the earlier instant. Times
/// inside a gap are shifted forward by the gap length.
///
/// ## Errors
/// Returns `InvalidTemporalInput` for an unknown zone name.
pub fn zoned_to_utc(local: NaiveDateTime, tzid: &str) -> ModelResult<UtcDateTime> {
    if tzid.eq_ignore_ascii_case(UTC_TZID) || tzid.eq_ignore_ascii_case("UTC") {
        return Ok(Utc.from_utc_datetime(&local));
    }

    let tz: chrono_tz::Tz = tzid
        .parse()
        .map_err(|_| ModelError::temporal(format_args!("unknown time zone {tzid:?}")))?;

    if let Some(resolved) = tz.from_local_datetime(&local).earliest() {
        return Ok(resolved.with_timezone(&Utc));
    }

    // Gaps are at most a few hours wide.
    (1..=24)
        .map(|hours| local + chrono::Duration::hours(hours))
        .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
        .map(|resolved| resolved.with_timezone(&Utc))
        .ok_or_else(|| ModelError::temporal(format_args!("{local} does not exist in {tzid}")))
}

/// Formats a UTC instant in wire form (`...Z`, fraction only when non-zero).
#[must_use]
pub fn format_utc(instant: &UtcDateTime) -> String {
    instant
        .format(jscal_core::constants::UTC_DATE_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, LOCAL_DATE_TIME_FORMAT).unwrap()
    }

    #[test]
    fn local_text_is_taken_as_written() {
        let plain = normalize_local(TemporalInput::Text("2024-03-01T09:30:00")).unwrap();
        let zoned = normalize_local(TemporalInput::Text("2024-03-01T09:30:00+05:00")).unwrap();
        assert_eq!(plain, zoned);
        assert_eq!(plain.to_string(), "2024-03-01T09:30:00");
        assert_eq!(
            plain.as_utc_encoded().naive_utc(),
            naive("2024-03-01T09:30:00")
        );
    }

    #[test]
    fn local_instant_is_converted_to_utc_clock() {
        let instant = DateTime::parse_from_rfc3339("2024-03-01T09:30:00+02:00").unwrap();
        let local = normalize_local(TemporalInput::Instant(instant)).unwrap();
        assert_eq!(local.to_string(), "2024-03-01T07:30:00");
    }

    #[test]
    fn local_keeps_fraction_and_accepts_dates() {
        let local = normalize_local(TemporalInput::Text("2024-03-01T09:30:00.250")).unwrap();
        assert_eq!(local.to_string(), "2024-03-01T09:30:00.250");
        let date = normalize_local(TemporalInput::Text("2024-03-01")).unwrap();
        assert!(date.is_midnight());
    }

    #[test]
    fn local_rejects_garbage() {
        let err = normalize_local(TemporalInput::Text("yesterday")).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTemporalInput(_)));
    }

    #[test]
    fn utc_applies_offsets() {
        let utc = normalize_utc(Some(TemporalInput::Text("2024-03-01T09:30:00+02:00")), false)
            .unwrap()
            .unwrap();
        assert_eq!(format_utc(&utc), "2024-03-01T07:30:00Z");
        let bare = normalize_utc(Some(TemporalInput::Text("2024-03-01T09:30:00")), false)
            .unwrap()
            .unwrap();
        assert_eq!(format_utc(&bare), "2024-03-01T09:30:00Z");
    }

    #[test]
    fn utc_absent_input() {
        assert!(normalize_utc(None, false).unwrap().is_none());
        let before = Utc::now();
        let now = normalize_utc(None, true).unwrap().unwrap();
        assert!(now >= before);
    }

    #[test]
    fn fraction_is_encoded_the_same_way_for_both_kinds() {
        let text = "2024-03-01T09:30:00.123456";
        let local = normalize_local(TemporalInput::Text(text)).unwrap();
        let utc = normalize_utc(Some(TemporalInput::Text(text)), false)
            .unwrap()
            .unwrap();
        assert_eq!(format!("{local}Z"), format_utc(&utc));
    }

    #[test]
    fn zoned_resolution() {
        let utc = zoned_to_utc(naive("2024-07-01T12:00:00"), "Europe/Berlin").unwrap();
        assert_eq!(format_utc(&utc), "2024-07-01T10:00:00Z");
        let gap = zoned_to_utc(naive("2024-03-10T02:30:00"), "America/New_York").unwrap();
        assert_eq!(format_utc(&gap), "2024-03-10T07:30:00Z");
        assert!(zoned_to_utc(naive("2024-07-01T12:00:00"), "Mars/Olympus").is_err());
    }

    #[test]
    fn serde_uses_wire_form() {
        let local: LocalDateTime = serde_json::from_str("\"2024-01-02T03:04:05\"").unwrap();
        assert_eq!(
            serde_json::to_string(&local).unwrap(),
            "\"2024-01-02T03:04:05\""
        );
    }
}
