//! JSON wire form of a recurrence rule.

use serde::{Deserialize, Serialize};

use super::{Frequency, NDay, RecurrenceEnd, RecurrenceRule, RuleMonth, Skip, Weekday};
use jscal_core::constants::DEFAULT_INTERVAL;

use crate::entity::marker::RecurrenceRuleType;
use crate::error::ModelError;
use crate::temporal::LocalDateTime;

const fn default_interval() -> u32 {
    DEFAULT_INTERVAL
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
fn is_default_interval(interval: &u32) -> bool {
    *interval == DEFAULT_INTERVAL
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
fn is_default_skip(skip: &Skip) -> bool {
    *skip == Skip::default()
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
fn is_default_weekday(day: &Weekday) -> bool {
    *day == Weekday::default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleWire {
    #[serde(rename = "@type", default)]
    object_type: RecurrenceRuleType,
    frequency: Frequency,
    #[serde(default = "default_interval", skip_serializing_if = "is_default_interval")]
    interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rscale: Option<String>,
    #[serde(default, skip_serializing_if = "is_default_skip")]
    skip: Skip,
    #[serde(default, skip_serializing_if = "is_default_weekday")]
    first_day_of_week: Weekday,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_day: Vec<NDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_month_day: Vec<i8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_month: Vec<RuleMonth>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_year_day: Vec<i16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_week_no: Vec<i8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_hour: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_minute: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_second: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    by_set_position: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<LocalDateTime>,
}

impl TryFrom<RuleWire> for RecurrenceRule {
    type Error = ModelError;

    fn try_from(wire: RuleWire) -> Result<Self, Self::Error> {
        // Lists go in before the frequency so the final check sees the
        // complete rule instead of a partial one.
        let mut rule = Self::new(Frequency::Yearly);
        rule.set_interval(wire.interval)?;
        rule.set_rscale(wire.rscale.as_deref());
        rule.set_skip(wire.skip);
        rule.set_first_day_of_week(wire.first_day_of_week);
        rule.set_by_day(wire.by_day)?;
        rule.set_by_month_day(wire.by_month_day)?;
        rule.set_by_month(wire.by_month)?;
        rule.set_by_year_day(wire.by_year_day)?;
        rule.set_by_week_no(wire.by_week_no)?;
        rule.set_by_hour(wire.by_hour)?;
        rule.set_by_minute(wire.by_minute)?;
        rule.set_by_second(wire.by_second)?;
        rule.set_by_set_position(wire.by_set_position)?;
        rule.set_frequency(wire.frequency)?;
        rule.end = Self::end_from(wire.count, wire.until)?;
        Ok(rule)
    }
}

impl From<RecurrenceRule> for RuleWire {
    fn from(rule: RecurrenceRule) -> Self {
        let (count, until) = match rule.end {
            Some(RecurrenceEnd::Count(count)) => (Some(count), None),
            Some(RecurrenceEnd::Until(until)) => (None, Some(until)),
            None => (None, None),
        };
        Self {
            object_type: RecurrenceRuleType,
            frequency: rule.frequency,
            interval: rule.interval,
            rscale: rule.rscale,
            skip: rule.skip,
            first_day_of_week: rule.first_day_of_week,
            by_day: rule.by_day,
            by_month_day: rule.by_month_day,
            by_month: rule.by_month,
            by_year_day: rule.by_year_day,
            by_week_no: rule.by_week_no,
            by_hour: rule.by_hour,
            by_minute: rule.by_minute,
            by_second: rule.by_second,
            by_set_position: rule.by_set_position,
            count,
            until,
        }
    }
}
