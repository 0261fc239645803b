//! DURATION value (RFC 5545 §3.3.6).

use std::fmt;

/// Exact duration as written in iCalendar.
///
/// iCalendar only knows weeks, days and clock units; calendar months and
/// years have no designator here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Duration {
    pub negative: bool,
    /// Weeks; a week-based duration carries no other component.
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Builds a day/clock duration.
    #[must_use]
    pub const fn dhms(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            negative: false,
            weeks: 0,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    #[must_use]
    pub const fn weeks(weeks: u32) -> Self {
        Self {
            weeks,
            ..Self::zero()
        }
    }

    #[must_use]
    pub const fn negate(mut self) -> Self {
        self.negative = !self.negative;
        self
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.weeks == 0 && self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Total signed length in seconds.
    #[must_use]
    pub const fn as_seconds(&self) -> i64 {
        let total = (self.weeks as i64 * 7 + self.days as i64) * 86_400
            + self.hours as i64 * 3600
            + self.minutes as i64 * 60
            + self.seconds as i64;
        if self.negative { -total } else { total }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.weeks > 0 {
            return write!(f, "{}W", self.weeks);
        }
        if self.is_zero() {
            return f.write_str("T0S");
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Duration::weeks(2).to_string(), "P2W");
        assert_eq!(Duration::dhms(1, 2, 30, 0).to_string(), "P1DT2H30M");
        assert_eq!(Duration::dhms(0, 0, 15, 0).to_string(), "PT15M");
        assert_eq!(Duration::dhms(0, 0, 15, 0).negate().to_string(), "-PT15M");
        assert_eq!(Duration::zero().to_string(), "PT0S");
    }

    #[test]
    fn as_seconds_is_signed() {
        assert_eq!(Duration::dhms(1, 2, 30, 0).as_seconds(), 86_400 + 2 * 3600 + 30 * 60);
        assert_eq!(Duration::dhms(0, 0, 15, 0).negate().as_seconds(), -900);
        assert_eq!(Duration::weeks(1).as_seconds(), 7 * 86_400);
    }
}
