//! Custom time zone definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::marker::{TimeZoneRuleType, TimeZoneType};
use crate::patch::PatchObject;
use crate::recurrence::RecurrenceRule;
use crate::temporal::{LocalDateTime, UtcDateTime};

/// A time zone, either a copy of a well-known zone or a custom one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZone {
    #[serde(rename = "@type", default)]
    object_type: TimeZoneType,
    pub tz_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standard: Vec<TimeZoneRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daylight: Vec<TimeZoneRule>,
}

impl TimeZone {
    #[must_use]
    pub fn new(tz_id: impl Into<String>) -> Self {
        Self {
            tz_id: tz_id.into(),
            ..Self::default()
        }
    }
}

/// One observance (standard or daylight) of a [`TimeZone`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneRule {
    #[serde(rename = "@type", default)]
    object_type: TimeZoneRuleType,
    pub start: LocalDateTime,
    /// UTC offset in `+hh:mm` form.
    pub offset_from: String,
    pub offset_to: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub recurrence_overrides: BTreeMap<LocalDateTime, PatchObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl TimeZoneRule {
    #[must_use]
    pub fn new(start: LocalDateTime, offset_from: impl Into<String>, offset_to: impl Into<String>) -> Self {
        Self {
            start,
            offset_from: offset_from.into(),
            offset_to: offset_to.into(),
            ..Self::default()
        }
    }
}
