//! DATE-TIME and UTC-OFFSET values (RFC 5545 §3.3.5, §3.3.14).

use std::fmt;

use chrono::{FixedOffset, NaiveDateTime};

/// UTC offset, stored as signed seconds east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    /// UTC offset (zero).
    pub const UTC: Self = Self { seconds: 0 };

    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    /// Creates an offset from signed hours and minutes, rejecting values
    /// outside ±18:00 (the chrono `FixedOffset` range).
    #[must_use]
    pub fn from_hm(hours: i8, minutes: u8) -> Option<Self> {
        let magnitude = i32::from(hours.unsigned_abs()) * 3600 + i32::from(minutes) * 60;
        let seconds = if hours < 0 { -magnitude } else { magnitude };
        (seconds.abs() < 18 * 3600 && minutes < 60).then_some(Self { seconds })
    }

    #[must_use]
    pub const fn as_seconds(self) -> i32 {
        self.seconds
    }

    /// Converts into a chrono offset.
    #[must_use]
    pub fn to_fixed_offset(self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.seconds)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let abs = self.seconds.unsigned_abs();
        write!(f, "{sign}{:02}{:02}", abs / 3600, (abs % 3600) / 60)?;
        if !abs.is_multiple_of(60) {
            write!(f, "{:02}", abs % 60)?;
        }
        Ok(())
    }
}

/// Form of a DATE-TIME value (RFC 5545 §3.3.5).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    /// Same wall-clock time in any zone: `19980118T230000`.
    Floating,
    /// Absolute instant: `19980119T070000Z`.
    Utc,
    /// Local time in a named zone: `TZID=America/New_York:19980119T020000`.
    Zoned {
        /// Zone identifier as carried in the TZID parameter.
        tzid: String,
    },
}

/// DATE-TIME value.
///
/// The wall-clock fields are kept as a chrono `NaiveDateTime`; how they are
/// anchored in time is described by [`DateTimeForm`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTime {
    /// Wall-clock fields (UTC clock fields for [`DateTimeForm::Utc`]).
    pub local: NaiveDateTime,
    pub form: DateTimeForm,
}

impl DateTime {
    #[must_use]
    pub const fn floating(local: NaiveDateTime) -> Self {
        Self {
            local,
            form: DateTimeForm::Floating,
        }
    }

    #[must_use]
    pub const fn utc(local: NaiveDateTime) -> Self {
        Self {
            local,
            form: DateTimeForm::Utc,
        }
    }

    #[must_use]
    pub fn zoned(local: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self {
            local,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    /// Builds a zoned value when `tzid` is present, floating otherwise.
    #[must_use]
    pub fn in_zone(local: NaiveDateTime, tzid: Option<&str>) -> Self {
        match tzid {
            Some(tz) => Self::zoned(local, tz),
            None => Self::floating(local),
        }
    }

    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self.form, DateTimeForm::Floating)
    }

    /// Returns the zone identifier of a zoned value.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            DateTimeForm::Floating | DateTimeForm::Utc => None,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local.format("%Y%m%dT%H%M%S"))?;
        if self.is_utc() {
            f.write_str("Z")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 23)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn utc_offset_display() {
        assert_eq!(UtcOffset::from_hm(5, 30).unwrap().to_string(), "+0530");
        assert_eq!(UtcOffset::from_hm(-8, 0).unwrap().to_string(), "-0800");
        assert_eq!(UtcOffset::UTC.to_string(), "+0000");
        assert_eq!(UtcOffset::from_seconds(-(3600 + 15)).to_string(), "-010015");
    }

    #[test]
    fn utc_offset_range() {
        assert!(UtcOffset::from_hm(19, 0).is_none());
        assert!(UtcOffset::from_hm(1, 60).is_none());
    }

    #[test]
    fn datetime_display() {
        assert_eq!(DateTime::utc(noon()).to_string(), "20260123T120000Z");
        assert_eq!(DateTime::floating(noon()).to_string(), "20260123T120000");
        let zoned = DateTime::zoned(noon(), "Europe/Vienna");
        assert_eq!(zoned.to_string(), "20260123T120000");
        assert_eq!(zoned.tzid(), Some("Europe/Vienna"));
    }

    #[test]
    fn in_zone_picks_form() {
        assert!(DateTime::in_zone(noon(), None).is_floating());
        assert_eq!(
            DateTime::in_zone(noon(), Some("Asia/Tokyo")).tzid(),
            Some("Asia/Tokyo")
        );
    }
}
