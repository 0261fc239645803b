use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::marker::NDayType;
use crate::error::ModelError;
use crate::temporal::LocalDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::Hourly => "hourly",
            Self::Minutely => "minutely",
            Self::Secondly => "secondly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with an occurrence that falls on a date the calendar lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skip {
    #[default]
    Omit,
    Backward,
    Forward,
}

/// Day of the week, ordered from Monday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[default]
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Mo,
        Self::Tu,
        Self::We,
        Self::Th,
        Self::Fr,
        Self::Sa,
        Self::Su,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mo => "mo",
            Self::Tu => "tu",
            Self::We => "we",
            Self::Th => "th",
            Self::Fr => "fr",
            Self::Sa => "sa",
            Self::Su => "su",
        }
    }

    /// Position in a Monday-first week, from 0.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// A weekday, optionally restricted to its n-th occurrence in the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NDay {
    #[serde(rename = "@type", default)]
    object_type: NDayType,
    pub day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth_of_period: Option<i32>,
}

impl NDay {
    #[must_use]
    pub fn every(day: Weekday) -> Self {
        Self {
            object_type: NDayType,
            day,
            nth_of_period: None,
        }
    }

    #[must_use]
    pub fn nth(day: Weekday, nth: i32) -> Self {
        Self {
            nth_of_period: Some(nth),
            ..Self::every(day)
        }
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.nth_of_period.is_some()
    }

    /// Weekday first (Monday first), then unqualified before qualified,
    /// then qualifier ascending.
    pub(crate) fn sort_key(&self) -> (u8, Option<i32>) {
        (self.day.index(), self.nth_of_period)
    }
}

/// A `byMonth` entry: a month number with an optional leap-month flag,
/// written `"5"` or `"5L"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleMonth {
    pub month: u8,
    pub leap: bool,
}

impl RuleMonth {
    #[must_use]
    pub const fn new(month: u8) -> Self {
        Self { month, leap: false }
    }

    #[must_use]
    pub const fn leap(month: u8) -> Self {
        Self { month, leap: true }
    }
}

impl fmt::Display for RuleMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.month)?;
        if self.leap {
            f.write_str("L")?;
        }
        Ok(())
    }
}

impl FromStr for RuleMonth {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, leap) = match s.strip_suffix(['L', 'l']) {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        match digits.parse::<u8>() {
            Ok(month @ 1..=13) => Ok(Self { month, leap }),
            _ => Err(ModelError::InvalidArgument(format!("invalid byMonth value {s:?}"))),
        }
    }
}

impl Serialize for RuleMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How a recurrence ends. A rule holds at most one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceEnd {
    Count(u32),
    Until(LocalDateTime),
}
