use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::{Months, NaiveDateTime};
use jscal_core::constants::ZERO_DURATION;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, ModelResult};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A signed calendar interval.
///
/// Each component is an independent magnitude; `negative` applies to all of
/// them. Years and months are nominal, so only durations without them
/// convert to an exact [`chrono::Duration`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Fraction of a second, in nanoseconds.
    pub nanos: u32,
}

impl Duration {
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn weeks(weeks: u32) -> Self {
        Self::days(weeks.saturating_mul(7))
    }

    #[must_use]
    pub fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            negative: !self.negative,
            ..self
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0 && !self.has_time()
    }

    /// Whether the duration has nominal (year or month) components.
    #[must_use]
    pub fn is_nominal(&self) -> bool {
        self.years != 0 || self.months != 0
    }

    fn has_time(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanos != 0
    }

    fn is_week_form(&self) -> bool {
        self.days != 0
            && self.days.is_multiple_of(7)
            && self.years == 0
            && self.months == 0
            && !self.has_time()
    }

    /// ## Summary
    /// Builds a duration from an exact `chrono` interval, splitting it into
    /// days, hours, minutes, seconds and a fraction.
    #[must_use]
    pub fn from_chrono(delta: chrono::Duration) -> Self {
        let negative = delta < chrono::Duration::zero();
        let delta = delta.abs();
        let total = delta.num_seconds();
        let nanos = delta.subsec_nanos().unsigned_abs();

        let to_u32 = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
        Self {
            negative,
            years: 0,
            months: 0,
            days: to_u32(total / 86_400),
            hours: to_u32(total % 86_400 / 3_600),
            minutes: to_u32(total % 3_600 / 60),
            seconds: to_u32(total % 60),
            nanos,
        }
    }

    /// The exact `chrono` interval, or `None` when years or months are set.
    #[must_use]
    pub fn to_chrono(&self) -> Option<chrono::Duration> {
        if self.is_nominal() {
            return None;
        }
        let magnitude = chrono::Duration::days(i64::from(self.days))
            + chrono::Duration::hours(i64::from(self.hours))
            + chrono::Duration::minutes(i64::from(self.minutes))
            + chrono::Duration::seconds(i64::from(self.seconds))
            + chrono::Duration::nanoseconds(i64::from(self.nanos));
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// ## Summary
    /// Adds the duration to a wall-clock time, applying years and months on
    /// the calendar first and the exact part afterwards.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn add_to(&self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        let months = Months::new(self.years.checked_mul(12)?.checked_add(self.months)?);
        let shifted = if self.negative {
            start.checked_sub_months(months)?
        } else {
            start.checked_add_months(months)?
        };
        let exact = Self {
            years: 0,
            months: 0,
            ..*self
        }
        .to_chrono()?;
        shifted.checked_add_signed(exact)
    }
}

/// Encodes a duration in its compact wire form.
#[must_use]
pub fn encode_duration(duration: &Duration) -> String {
    duration.to_string()
}

/// ## Summary
/// Decodes the wire form of a duration.
///
/// ## Errors
/// Returns `InvalidTemporalInput` when the text is not a duration.
pub fn decode_duration(text: &str) -> ModelResult<Duration> {
    text.parse()
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str(ZERO_DURATION);
        }
        if self.negative {
            f.write_char('-')?;
        }
        f.write_char('P')?;
        if self.is_week_form() {
            return write!(f, "{}W", self.days / 7);
        }

        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        if self.has_time() {
            f.write_char('T')?;
            for (value, designator) in [(self.hours, 'H'), (self.minutes, 'M')] {
                if value != 0 {
                    write!(f, "{value}{designator}")?;
                }
            }
            if self.seconds != 0 || self.nanos != 0 {
                write!(f, "{}", self.seconds)?;
                if self.nanos != 0 {
                    let fraction = format!("{:09}", self.nanos);
                    write!(f, ".{}", fraction.trim_end_matches('0'))?;
                }
                f.write_char('S')?;
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::temporal(format_args!("duration {s:?}: {reason}"));

        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let body = rest
            .strip_prefix('P')
            .ok_or_else(|| invalid("missing P prefix"))?;
        if body.is_empty() {
            return Err(invalid("no designators"));
        }

        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => {
                if time.is_empty() {
                    return Err(invalid("T without a time designator"));
                }
                (date, Some(time))
            }
            None => (body, None),
        };

        let mut duration = Duration {
            negative,
            ..Duration::default()
        };

        let date_fields = designated(date_part, &['Y', 'M', 'W', 'D']).map_err(invalid)?;
        let has_weeks = date_fields.iter().any(|(d, _)| *d == 'W');
        if has_weeks && (date_fields.len() > 1 || time_part.is_some()) {
            return Err(invalid("weeks cannot be combined with other designators"));
        }
        for (designator, number) in date_fields {
            let value = whole(number).map_err(invalid)?;
            match designator {
                'Y' => duration.years = value,
                'M' => duration.months = value,
                'W' => duration.days = value.checked_mul(7).ok_or_else(|| invalid("overflow"))?,
                _ => duration.days = value,
            }
        }

        if let Some(time_part) = time_part {
            for (designator, number) in
                designated(time_part, &['H', 'M', 'S']).map_err(invalid)?
            {
                match designator {
                    'H' => duration.hours = whole(number).map_err(invalid)?,
                    'M' => duration.minutes = whole(number).map_err(invalid)?,
                    _ => {
                        let (secs, nanos) = seconds(number).map_err(invalid)?;
                        duration.seconds = secs;
                        duration.nanos = nanos;
                    }
                }
            }
        }

        Ok(duration)
    }
}

/// Splits `"1Y2D"` into `[('Y', "1"), ('D', "2")]`, enforcing designator order.
fn designated<'a>(part: &'a str, order: &[char]) -> Result<Vec<(char, &'a str)>, &'static str> {
    let mut fields = Vec::new();
    let mut next = 0;
    let mut start = 0;
    for (idx, c) in part.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }
        let position = order[next..]
            .iter()
            .position(|d| *d == c)
            .ok_or("unexpected or out-of-order designator")?;
        let number = &part[start..idx];
        if number.is_empty() {
            return Err("designator without a number");
        }
        fields.push((c, number));
        next += position + 1;
        start = idx + c.len_utf8();
    }
    if start != part.len() {
        return Err("number without a designator");
    }
    Ok(fields)
}

fn whole(number: &str) -> Result<u32, &'static str> {
    number.parse().map_err(|_| "not a whole number")
}

fn seconds(number: &str) -> Result<(u32, u32), &'static str> {
    let number = number.replace(',', ".");
    let Some((secs, fraction)) = number.split_once('.') else {
        return Ok((whole(&number)?, 0));
    };
    if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err("invalid fraction of a second");
    }
    let scale = 10u32.pow(9 - u32::try_from(fraction.len()).map_err(|_| "fraction too long")?);
    let nanos = whole(fraction)? * scale;
    debug_assert!(nanos < NANOS_PER_SECOND);
    Ok((whole(secs)?, nanos))
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_encodes_to_full_form() {
        assert_eq!(encode_duration(&Duration::zero()), "PT0H0M0S");
        assert_eq!(Duration::zero().negated().to_string(), "PT0H0M0S");
    }

    #[test]
    fn multiples_of_seven_days_use_weeks() {
        for weeks in 1..=60 {
            let duration = Duration::weeks(weeks);
            let encoded = encode_duration(&duration);
            assert_eq!(encoded, format!("P{weeks}W"));
            assert_eq!(decode_duration(&encoded).unwrap(), duration);
        }
        assert_eq!(Duration::days(7).negated().to_string(), "-P1W");
    }

    #[test]
    fn any_other_component_prevents_weeks() {
        let samples = [
            Duration { hours: 1, ..Duration::weeks(2) },
            Duration { months: 1, ..Duration::weeks(1) },
            Duration { years: 2, ..Duration::weeks(3) },
            Duration { seconds: 5, ..Duration::weeks(1) },
            Duration { nanos: 5, ..Duration::weeks(1) },
            Duration::days(8),
        ];
        for duration in samples {
            assert!(!encode_duration(&duration).contains('W'), "{duration:?}");
        }
    }

    #[test]
    fn designator_form() {
        let duration = Duration {
            years: 1,
            months: 2,
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
            ..Duration::default()
        };
        assert_eq!(duration.to_string(), "P1Y2M3DT4H5M6S");
        assert_eq!(Duration::hms(0, 15, 0).negated().to_string(), "-PT15M");
        assert_eq!("P1Y2M3DT4H5M6S".parse::<Duration>().unwrap(), duration);
    }

    #[test]
    fn fractional_seconds() {
        let duration: Duration = "PT1.5S".parse().unwrap();
        assert_eq!(duration.seconds, 1);
        assert_eq!(duration.nanos, 500_000_000);
        assert_eq!(duration.to_string(), "PT1.5S");
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "PT", "1D", "P1DT", "P", "P1H", "PT1M1H", "P1D2D", "PW", "P1W2D", "P1WT1H", "PT1.S", "P-1D", "P1"] {
            assert!(decode_duration(text).is_err(), "{text} should be rejected");
        }
    }

    #[test]
    fn chrono_conversions() {
        let duration = Duration::from_chrono(chrono::Duration::minutes(-90));
        assert!(duration.negative);
        assert_eq!(duration.to_string(), "-PT1H30M");
        assert_eq!(duration.to_chrono(), Some(chrono::Duration::minutes(-90)));
        assert_eq!(Duration { months: 1, ..Duration::zero() }.to_chrono(), None);
    }

    #[test]
    fn add_to_honours_calendar_months() {
        let start = NaiveDateTime::parse_from_str("2024-01-31T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let end = Duration { months: 1, hours: 2, ..Duration::zero() }.add_to(start).unwrap();
        assert_eq!(end.to_string(), "2024-02-29 12:00:00");
    }
}
