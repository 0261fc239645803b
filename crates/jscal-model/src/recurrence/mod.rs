//! Recurrence rules.
//!
//! ## Summary
//! A [`RecurrenceRule`] can only hold a valid combination of properties:
//! every setter checks the cross-field rules and every by-list is kept
//! sorted. The JSON wire form is validated again on input.

mod types;
mod validate;
pub(crate) mod wire;

use jscal_core::constants::{DEFAULT_INTERVAL, DEFAULT_RSCALE};

use crate::error::{ModelError, ModelResult, RecurrenceConstraint};
use crate::temporal::LocalDateTime;

pub use types::{Frequency, NDay, RecurrenceEnd, RuleMonth, Skip, Weekday};
use validate::Constrained;

/// A repeating pattern.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "wire::RuleWire", into = "wire::RuleWire")]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    rscale: Option<String>,
    skip: Skip,
    first_day_of_week: Weekday,
    by_day: Vec<NDay>,
    by_month_day: Vec<i8>,
    by_month: Vec<RuleMonth>,
    by_year_day: Vec<i16>,
    by_week_no: Vec<i8>,
    by_hour: Vec<u8>,
    by_minute: Vec<u8>,
    by_second: Vec<u8>,
    by_set_position: Vec<i32>,
    end: Option<RecurrenceEnd>,
}

/// Sorts ascending and drops duplicates.
fn sorted<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort_unstable();
    values.dedup();
    values
}

fn in_range<T>(name: &str, values: &[T], valid: impl Fn(&T) -> bool) -> ModelResult<()>
where
    T: std::fmt::Debug,
{
    match values.iter().find(|v| !valid(v)) {
        Some(bad) => Err(ModelError::InvalidArgument(format!(
            "{name} value {bad:?} out of range"
        ))),
        None => Ok(()),
    }
}

impl RecurrenceRule {
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: DEFAULT_INTERVAL,
            rscale: None,
            skip: Skip::default(),
            first_day_of_week: Weekday::default(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
            by_second: Vec::new(),
            by_set_position: Vec::new(),
            end: None,
        }
    }

    fn constrained(&self) -> Constrained<'_> {
        Constrained {
            frequency: self.frequency,
            by_day: &self.by_day,
            by_month_day: &self.by_month_day,
            by_year_day: &self.by_year_day,
            by_week_no: &self.by_week_no,
        }
    }

    fn check_with<'a>(&'a self, change: impl FnOnce(&mut Constrained<'a>)) -> ModelResult<()> {
        let mut candidate = self.constrained();
        change(&mut candidate);
        validate::check(&candidate).map_err(ModelError::from)
    }

    /// ## Summary
    /// Re-checks every cross-field rule.
    ///
    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` naming the broken rule.
    pub fn validate(&self) -> ModelResult<()> {
        self.check_with(|_| {})
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` when the populated by-lists
    /// are not allowed with `frequency`.
    pub fn set_frequency(&mut self, frequency: Frequency) -> ModelResult<()> {
        self.check_with(|c| c.frequency = frequency)?;
        self.frequency = frequency;
        Ok(())
    }

    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// ## Errors
    /// Returns `InvalidArgument` for an interval of zero.
    pub fn set_interval(&mut self, interval: u32) -> ModelResult<()> {
        if interval == 0 {
            return Err(ModelError::InvalidArgument("interval must be positive".into()));
        }
        self.interval = interval;
        Ok(())
    }

    /// The calendar scale, `gregorian` when unset.
    #[must_use]
    pub fn rscale(&self) -> &str {
        self.rscale.as_deref().unwrap_or(DEFAULT_RSCALE)
    }

    /// Sets the calendar scale (lowercased). The default scale is stored as unset.
    pub fn set_rscale(&mut self, rscale: Option<&str>) {
        self.rscale = rscale
            .map(str::to_ascii_lowercase)
            .filter(|s| !s.is_empty() && s != DEFAULT_RSCALE);
    }

    #[must_use]
    pub fn skip(&self) -> Skip {
        self.skip
    }

    pub fn set_skip(&mut self, skip: Skip) {
        self.skip = skip;
    }

    #[must_use]
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn set_first_day_of_week(&mut self, day: Weekday) {
        self.first_day_of_week = day;
    }

    #[must_use]
    pub fn by_day(&self) -> &[NDay] {
        &self.by_day
    }

    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` when an entry carries an
    /// `nthOfPeriod` the frequency does not allow, `InvalidArgument` for a
    /// zero qualifier.
    pub fn set_by_day(&mut self, mut days: Vec<NDay>) -> ModelResult<()> {
        if days.iter().any(|d| d.nth_of_period == Some(0)) {
            return Err(ModelError::InvalidArgument("nthOfPeriod must not be zero".into()));
        }
        days.sort_unstable_by_key(NDay::sort_key);
        days.dedup();
        self.check_with(|c| c.by_day = &days)?;
        self.by_day = days;
        Ok(())
    }

    #[must_use]
    pub fn by_month_day(&self) -> &[i8] {
        &self.by_month_day
    }

    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` on weekly rules,
    /// `InvalidArgument` outside `-31..=31` or for zero.
    pub fn set_by_month_day(&mut self, days: Vec<i8>) -> ModelResult<()> {
        in_range("byMonthDay", &days, |d| *d != 0 && (-31..=31).contains(d))?;
        let days = sorted(days);
        self.check_with(|c| c.by_month_day = &days)?;
        self.by_month_day = days;
        Ok(())
    }

    #[must_use]
    pub fn by_month(&self) -> &[RuleMonth] {
        &self.by_month
    }

    /// Months sort by number, a leap month after its plain month.
    ///
    /// ## Errors
    /// Returns `InvalidArgument` for a month outside `1..=13`.
    pub fn set_by_month(&mut self, months: Vec<RuleMonth>) -> ModelResult<()> {
        in_range("byMonth", &months, |m| (1..=13).contains(&m.month))?;
        self.by_month = sorted(months);
        Ok(())
    }

    #[must_use]
    pub fn by_year_day(&self) -> &[i16] {
        &self.by_year_day
    }

    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` on daily, weekly and monthly
    /// rules, `InvalidArgument` outside `-366..=366` or for zero.
    pub fn set_by_year_day(&mut self, days: Vec<i16>) -> ModelResult<()> {
        in_range("byYearDay", &days, |d| *d != 0 && (-366..=366).contains(d))?;
        let days = sorted(days);
        self.check_with(|c| c.by_year_day = &days)?;
        self.by_year_day = days;
        Ok(())
    }

    #[must_use]
    pub fn by_week_no(&self) -> &[i8] {
        &self.by_week_no
    }

    /// ## Errors
    /// Returns `RecurrenceConstraintViolation` unless the rule is yearly
    /// with plain weekdays only, `InvalidArgument` outside `-53..=53` or
    /// for zero.
    pub fn set_by_week_no(&mut self, weeks: Vec<i8>) -> ModelResult<()> {
        in_range("byWeekNo", &weeks, |w| *w != 0 && (-53..=53).contains(w))?;
        let weeks = sorted(weeks);
        self.check_with(|c| c.by_week_no = &weeks)?;
        self.by_week_no = weeks;
        Ok(())
    }

    #[must_use]
    pub fn by_hour(&self) -> &[u8] {
        &self.by_hour
    }

    /// ## Errors
    /// Returns `InvalidArgument` for hours above 23.
    pub fn set_by_hour(&mut self, hours: Vec<u8>) -> ModelResult<()> {
        in_range("byHour", &hours, |h| *h <= 23)?;
        self.by_hour = sorted(hours);
        Ok(())
    }

    #[must_use]
    pub fn by_minute(&self) -> &[u8] {
        &self.by_minute
    }

    /// ## Errors
    /// Returns `InvalidArgument` for minutes above 59.
    pub fn set_by_minute(&mut self, minutes: Vec<u8>) -> ModelResult<()> {
        in_range("byMinute", &minutes, |m| *m <= 59)?;
        self.by_minute = sorted(minutes);
        Ok(())
    }

    #[must_use]
    pub fn by_second(&self) -> &[u8] {
        &self.by_second
    }

    /// ## Errors
    /// Returns `InvalidArgument` for seconds above 60.
    pub fn set_by_second(&mut self, seconds: Vec<u8>) -> ModelResult<()> {
        in_range("bySecond", &seconds, |s| *s <= 60)?;
        self.by_second = sorted(seconds);
        Ok(())
    }

    #[must_use]
    pub fn by_set_position(&self) -> &[i32] {
        &self.by_set_position
    }

    /// ## Errors
    /// Returns `InvalidArgument` for a zero position.
    pub fn set_by_set_position(&mut self, positions: Vec<i32>) -> ModelResult<()> {
        in_range("bySetPosition", &positions, |p| *p != 0)?;
        self.by_set_position = sorted(positions);
        Ok(())
    }

    #[must_use]
    pub fn end(&self) -> Option<RecurrenceEnd> {
        self.end
    }

    #[must_use]
    pub fn count(&self) -> Option<u32> {
        match self.end {
            Some(RecurrenceEnd::Count(count)) => Some(count),
            _ => None,
        }
    }

    #[must_use]
    pub fn until(&self) -> Option<LocalDateTime> {
        match self.end {
            Some(RecurrenceEnd::Until(until)) => Some(until),
            _ => None,
        }
    }

    /// Limits the rule to `count` occurrences, replacing any `until`.
    pub fn set_count(&mut self, count: u32) {
        self.end = Some(RecurrenceEnd::Count(count));
    }

    /// Ends the rule at `until`, replacing any `count`.
    pub fn set_until(&mut self, until: LocalDateTime) {
        self.end = Some(RecurrenceEnd::Until(until));
    }

    pub fn clear_end(&mut self) {
        self.end = None;
    }

    /// Combines a separately given `count` and `until`; at most one may be set.
    pub(crate) fn end_from(
        count: Option<u32>,
        until: Option<LocalDateTime>,
    ) -> ModelResult<Option<RecurrenceEnd>> {
        match (count, until) {
            (Some(_), Some(_)) => Err(RecurrenceConstraint::CountAndUntil.into()),
            (Some(count), None) => Ok(Some(RecurrenceEnd::Count(count))),
            (None, Some(until)) => Ok(Some(RecurrenceEnd::Until(until))),
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests;
