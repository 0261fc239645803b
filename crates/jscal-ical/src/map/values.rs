//! Date-time, duration and offset conversions between the model and
//! iCalendar values.

use chrono::{NaiveDateTime, TimeZone as _, Timelike as _, Utc};
use jscal_core::constants::UTC_TZID;
use jscal_model::temporal::zoned_to_utc;
use jscal_model::{Duration, LocalDateTime, UtcDateTime};
use jscal_rfc::ical::core::{
    Date, DateOrDateTime, DateTime, DateTimeForm, Duration as IcalDuration, UtcOffset,
};

/// Whether `tzid` names UTC itself.
pub(crate) fn is_utc_zone(tzid: &str) -> bool {
    tzid.eq_ignore_ascii_case(UTC_TZID) || tzid.eq_ignore_ascii_case("UTC")
}

/// A wall-clock value with the zone it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Anchored {
    pub local: LocalDateTime,
    pub time_zone: Option<String>,
    pub date_only: bool,
}

impl From<&DateOrDateTime> for Anchored {
    fn from(value: &DateOrDateTime) -> Self {
        match value {
            DateOrDateTime::Date(date) => Self {
                local: LocalDateTime::from_date(date.0),
                time_zone: None,
                date_only: true,
            },
            DateOrDateTime::DateTime(dt) => Self {
                local: LocalDateTime::new(dt.local),
                time_zone: match &dt.form {
                    DateTimeForm::Floating => None,
                    DateTimeForm::Utc => Some(UTC_TZID.to_string()),
                    DateTimeForm::Zoned { tzid } => Some(tzid.clone()),
                },
                date_only: false,
            },
        }
    }
}

/// ## Summary
/// The iCalendar form of a wall-clock value.
///
/// A midnight value of an all-day object becomes a DATE. UTC zones become
/// `Z` values, other zones a TZID, and no zone a floating time.
pub(crate) fn ical_time(
    local: LocalDateTime,
    time_zone: Option<&str>,
    date_only: bool,
) -> DateOrDateTime {
    let naive = local.naive();
    if date_only && local.is_midnight() {
        return DateOrDateTime::Date(Date(naive.date()));
    }
    DateOrDateTime::DateTime(match time_zone {
        Some(tz) if is_utc_zone(tz) => DateTime::utc(naive),
        tz => DateTime::in_zone(naive, tz),
    })
}

/// ## Summary
/// The instant a DATE-TIME denotes.
///
/// Floating values are read as UTC. A zone that cannot be resolved falls
/// back to UTC clock fields with a warning.
pub(crate) fn instant(value: &DateTime) -> UtcDateTime {
    match &value.form {
        DateTimeForm::Utc | DateTimeForm::Floating => Utc.from_utc_datetime(&value.local),
        DateTimeForm::Zoned { tzid } => zoned_to_utc(value.local, tzid).unwrap_or_else(|error| {
            tracing::warn!(%tzid, %error, "Unresolvable zone, reading time as UTC");
            Utc.from_utc_datetime(&value.local)
        }),
    }
}

/// The instant a DATE or DATE-TIME denotes; a DATE means midnight UTC.
pub(crate) fn instant_of(value: &DateOrDateTime) -> UtcDateTime {
    match value {
        DateOrDateTime::Date(date) => Utc.from_utc_datetime(&date.at_midnight()),
        DateOrDateTime::DateTime(dt) => instant(dt),
    }
}

/// A UTC DATE-TIME for `instant`; iCalendar carries no fractional seconds.
pub(crate) fn ical_instant(instant: &UtcDateTime) -> DateTime {
    let naive = instant.naive_utc();
    DateTime::utc(naive.with_nanosecond(0).unwrap_or(naive))
}

/// Wall-clock fields of `instant` in `tzid`, if the zone is known.
pub(crate) fn utc_to_zone(instant: &UtcDateTime, tzid: &str) -> Option<NaiveDateTime> {
    if is_utc_zone(tzid) {
        return Some(instant.naive_utc());
    }
    let tz: chrono_tz::Tz = tzid.parse().ok()?;
    Some(instant.with_timezone(&tz).naive_local())
}

/// ## Summary
/// Expresses a DATE or DATE-TIME in the zone of the object it belongs to.
///
/// Values already in that zone (or both floating) keep their fields. Values
/// anchored elsewhere are converted through their instant.
pub(crate) fn local_in(value: &DateOrDateTime, time_zone: Option<&str>) -> LocalDateTime {
    let anchored = Anchored::from(value);
    let same_zone = match (anchored.time_zone.as_deref(), time_zone) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => a == b || (is_utc_zone(a) && is_utc_zone(b)),
    };
    if same_zone || anchored.date_only {
        return anchored.local;
    }
    time_zone
        .and_then(|tz| utc_to_zone(&instant_of(value), tz))
        .map_or(anchored.local, LocalDateTime::new)
}

/// ## Summary
/// The iCalendar DURATION for a model duration.
///
/// Returns `None` when the duration cannot be written exactly: years,
/// months or fractional seconds.
pub(crate) fn ical_duration(duration: &Duration) -> Option<IcalDuration> {
    if duration.is_nominal() || duration.nanos != 0 {
        return None;
    }
    let only_days = duration.hours == 0 && duration.minutes == 0 && duration.seconds == 0;
    let value = if only_days && duration.days != 0 && duration.days.is_multiple_of(7) {
        IcalDuration::weeks(duration.days / 7)
    } else {
        IcalDuration::dhms(
            duration.days,
            duration.hours,
            duration.minutes,
            duration.seconds,
        )
    };
    Some(if duration.negative {
        value.negate()
    } else {
        value
    })
}

pub(crate) fn model_duration(duration: &IcalDuration) -> Duration {
    Duration {
        negative: duration.negative,
        days: duration.weeks.saturating_mul(7).saturating_add(duration.days),
        hours: duration.hours,
        minutes: duration.minutes,
        seconds: duration.seconds,
        ..Duration::default()
    }
}

/// `+hh:mm`, with `:ss` only when seconds are present.
pub(crate) fn format_offset(offset: UtcOffset) -> String {
    let seconds = offset.as_seconds();
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes) = (abs / 3600, abs % 3600 / 60);
    if abs.is_multiple_of(60) {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{:02}", abs % 60)
    }
}

/// Reads `+hh:mm[:ss]`, also accepting the compact `+hhmm[ss]` form.
pub(crate) fn parse_offset(text: &str) -> Option<UtcOffset> {
    let (negative, body) = match text.as_bytes().first()? {
        b'+' => (false, &text[1..]),
        b'-' => (true, &text[1..]),
        _ => return None,
    };
    let digits: String = body.chars().filter(|c| *c != ':').collect();
    if !matches!(digits.len(), 4 | 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let field = |range: std::ops::Range<usize>| digits.get(range)?.parse::<i32>().ok();
    let hours = field(0..2)?;
    let minutes = field(2..4)?;
    let secs = if digits.len() == 6 { field(4..6)? } else { 0 };
    if minutes > 59 || secs > 59 {
        return None;
    }
    let total = hours * 3600 + minutes * 60 + secs;
    Some(UtcOffset::from_seconds(if negative { -total } else { total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn wall_clock_forms() {
        let local = LocalDateTime::new(at(9, 30));
        assert_eq!(
            ical_time(local, Some("Etc/UTC"), false),
            DateOrDateTime::DateTime(DateTime::utc(at(9, 30)))
        );
        assert_eq!(
            ical_time(local, Some("Europe/Berlin"), false),
            DateOrDateTime::DateTime(DateTime::zoned(at(9, 30), "Europe/Berlin"))
        );
        assert_eq!(
            ical_time(local, None, true),
            DateOrDateTime::DateTime(DateTime::floating(at(9, 30)))
        );

        let midnight = LocalDateTime::new(at(0, 0));
        assert!(ical_time(midnight, Some("Europe/Berlin"), true).is_date());
    }

    #[test]
    fn anchored_from_values() {
        let zoned = DateOrDateTime::DateTime(DateTime::zoned(at(9, 0), "Europe/Berlin"));
        let anchored = Anchored::from(&zoned);
        assert_eq!(anchored.time_zone.as_deref(), Some("Europe/Berlin"));
        assert!(!anchored.date_only);

        let utc = Anchored::from(&DateOrDateTime::DateTime(DateTime::utc(at(9, 0))));
        assert_eq!(utc.time_zone.as_deref(), Some("Etc/UTC"));
    }

    #[test]
    fn utc_value_moved_into_object_zone() {
        let utc = DateOrDateTime::DateTime(DateTime::utc(at(8, 0)));
        // Berlin is UTC+1 in early March.
        assert_eq!(local_in(&utc, Some("Europe/Berlin")).naive(), at(9, 0));
        assert_eq!(local_in(&utc, None).naive(), at(8, 0));
        assert_eq!(local_in(&utc, Some("UTC")).naive(), at(8, 0));
    }

    #[test]
    fn durations_to_ical() {
        let week = ical_duration(&Duration::weeks(2)).unwrap();
        assert_eq!(week.to_string(), "P2W");

        let mixed = ical_duration(&Duration::hms(1, 30, 0).negated()).unwrap();
        assert_eq!(mixed.to_string(), "-PT1H30M");

        let nominal = Duration {
            months: 1,
            ..Duration::default()
        };
        assert!(ical_duration(&nominal).is_none());
    }

    #[test]
    fn weeks_read_as_days() {
        let duration = model_duration(&IcalDuration::weeks(1));
        assert_eq!(duration.days, 7);
        assert_eq!(duration.to_string(), "P1W");
    }

    #[test]
    fn offsets() {
        assert_eq!(format_offset(UtcOffset::from_seconds(3600)), "+01:00");
        assert_eq!(format_offset(UtcOffset::from_seconds(-(5 * 3600 + 30 * 60))), "-05:30");
        assert_eq!(format_offset(UtcOffset::from_seconds(-3630)), "-01:00:30");
        assert_eq!(parse_offset("+01:00"), Some(UtcOffset::from_seconds(3600)));
        assert_eq!(parse_offset("-0530"), Some(UtcOffset::from_seconds(-19_800)));
        assert_eq!(parse_offset("+01:00:30"), Some(UtcOffset::from_seconds(3630)));
        assert_eq!(parse_offset("0100"), None);
        assert_eq!(parse_offset("+1:00"), None);
    }
}
