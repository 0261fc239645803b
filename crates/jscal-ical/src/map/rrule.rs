//! Recurrence rules to and from RRULE values.

use jscal_core::constants::DEFAULT_RSCALE;
use jscal_model::recurrence::{Frequency, NDay, RuleMonth, Skip, Weekday};
use jscal_model::temporal::zoned_to_utc;
use jscal_model::error::RecurrenceConstraint;
use jscal_model::{LocalDateTime, ModelError, RecurrenceRule};
use jscal_rfc::ical::core::{
    Date, DateOrDateTime, DateTime, DateTimeForm, Frequency as IcalFrequency, MonthNum, RRule,
    RRuleUntil, Skip as IcalSkip, Weekday as IcalWeekday, WeekdayNum,
};

use super::values::{ical_instant, instant, utc_to_zone};
use crate::error::{IcalError, IcalResult};

const fn ical_frequency(frequency: Frequency) -> IcalFrequency {
    match frequency {
        Frequency::Yearly => IcalFrequency::Yearly,
        Frequency::Monthly => IcalFrequency::Monthly,
        Frequency::Weekly => IcalFrequency::Weekly,
        Frequency::Daily => IcalFrequency::Daily,
        Frequency::Hourly => IcalFrequency::Hourly,
        Frequency::Minutely => IcalFrequency::Minutely,
        Frequency::Secondly => IcalFrequency::Secondly,
    }
}

const fn model_frequency(frequency: IcalFrequency) -> Frequency {
    match frequency {
        IcalFrequency::Yearly => Frequency::Yearly,
        IcalFrequency::Monthly => Frequency::Monthly,
        IcalFrequency::Weekly => Frequency::Weekly,
        IcalFrequency::Daily => Frequency::Daily,
        IcalFrequency::Hourly => Frequency::Hourly,
        IcalFrequency::Minutely => Frequency::Minutely,
        IcalFrequency::Secondly => Frequency::Secondly,
    }
}

const fn ical_weekday(day: Weekday) -> IcalWeekday {
    match day {
        Weekday::Mo => IcalWeekday::Monday,
        Weekday::Tu => IcalWeekday::Tuesday,
        Weekday::We => IcalWeekday::Wednesday,
        Weekday::Th => IcalWeekday::Thursday,
        Weekday::Fr => IcalWeekday::Friday,
        Weekday::Sa => IcalWeekday::Saturday,
        Weekday::Su => IcalWeekday::Sunday,
    }
}

const fn model_weekday(day: IcalWeekday) -> Weekday {
    match day {
        IcalWeekday::Monday => Weekday::Mo,
        IcalWeekday::Tuesday => Weekday::Tu,
        IcalWeekday::Wednesday => Weekday::We,
        IcalWeekday::Thursday => Weekday::Th,
        IcalWeekday::Friday => Weekday::Fr,
        IcalWeekday::Saturday => Weekday::Sa,
        IcalWeekday::Sunday => Weekday::Su,
    }
}

const fn ical_skip(skip: Skip) -> IcalSkip {
    match skip {
        Skip::Omit => IcalSkip::Omit,
        Skip::Backward => IcalSkip::Backward,
        Skip::Forward => IcalSkip::Forward,
    }
}

const fn model_skip(skip: IcalSkip) -> Skip {
    match skip {
        IcalSkip::Omit => Skip::Omit,
        IcalSkip::Backward => Skip::Backward,
        IcalSkip::Forward => Skip::Forward,
    }
}

fn out_of_range(what: &str, value: i32, error: std::num::TryFromIntError) -> IcalError {
    IcalError::InvalidComponent(format!("{what} {value} does not fit an RRULE: {error}"))
}

/// ## Summary
/// The UNTIL value of a rule whose series starts at `start`.
///
/// UNTIL takes the form of DTSTART: a DATE for all-day series, a UTC time
/// for zoned or UTC series, a floating time otherwise.
fn until_value(until: LocalDateTime, start: Option<&DateOrDateTime>) -> RRuleUntil {
    let naive = until.naive();
    match start {
        Some(DateOrDateTime::Date(_)) => RRuleUntil::Date(Date(naive.date())),
        Some(DateOrDateTime::DateTime(DateTime {
            form: DateTimeForm::Utc,
            ..
        })) => RRuleUntil::DateTime(DateTime::utc(naive)),
        Some(DateOrDateTime::DateTime(DateTime {
            form: DateTimeForm::Zoned { tzid },
            ..
        })) => match zoned_to_utc(naive, tzid) {
            Ok(instant) => RRuleUntil::DateTime(ical_instant(&instant)),
            Err(error) => {
                tracing::warn!(%tzid, %error, "Writing UNTIL as floating time");
                RRuleUntil::DateTime(DateTime::floating(naive))
            }
        },
        _ => RRuleUntil::DateTime(DateTime::floating(naive)),
    }
}

/// ## Summary
/// Writes a recurrence rule as an RRULE value.
///
/// ## Errors
/// Returns `InvalidComponent` when a by-list entry does not fit the RRULE
/// integer ranges.
pub(crate) fn to_rrule(rule: &RecurrenceRule, start: Option<&DateOrDateTime>) -> IcalResult<RRule> {
    let non_default_scale = rule.rscale() != DEFAULT_RSCALE;
    let non_default_skip = rule.skip() != Skip::default();

    let by_day = rule
        .by_day()
        .iter()
        .map(|nday| {
            let ordinal = nday
                .nth_of_period
                .map(|n| i8::try_from(n).map_err(|e| out_of_range("byDay ordinal", n, e)))
                .transpose()?;
            Ok(WeekdayNum {
                ordinal,
                weekday: ical_weekday(nday.day),
            })
        })
        .collect::<IcalResult<Vec<_>>>()?;
    let by_setpos = rule
        .by_set_position()
        .iter()
        .map(|&p| i16::try_from(p).map_err(|e| out_of_range("bySetPosition", p, e)))
        .collect::<IcalResult<Vec<_>>>()?;

    Ok(RRule {
        freq: Some(ical_frequency(rule.frequency())),
        rscale: (non_default_scale || non_default_skip).then(|| rule.rscale().to_ascii_uppercase()),
        skip: non_default_skip.then_some(ical_skip(rule.skip())),
        interval: (rule.interval() != 1).then_some(rule.interval()),
        until: rule.until().map(|until| until_value(until, start)),
        count: rule.count(),
        wkst: (rule.first_day_of_week() != Weekday::Mo)
            .then_some(ical_weekday(rule.first_day_of_week())),
        by_second: rule.by_second().to_vec(),
        by_minute: rule.by_minute().to_vec(),
        by_hour: rule.by_hour().to_vec(),
        by_day,
        by_monthday: rule.by_month_day().to_vec(),
        by_yearday: rule.by_year_day().to_vec(),
        by_weekno: rule.by_week_no().to_vec(),
        by_month: rule
            .by_month()
            .iter()
            .map(|m| MonthNum {
                month: m.month,
                leap: m.leap,
            })
            .collect(),
        by_setpos,
    })
}

/// ## Summary
/// Reads an RRULE value into a validated recurrence rule.
///
/// A UTC UNTIL is moved into `time_zone`, the zone of the series start.
///
/// ## Errors
/// Returns `InvalidComponent` when FREQ is missing, or a model error when
/// the parts break a recurrence constraint, COUNT together with UNTIL
/// included.
pub(crate) fn from_rrule(recur: &RRule, time_zone: Option<&str>) -> IcalResult<RecurrenceRule> {
    let frequency = recur
        .freq
        .ok_or_else(|| IcalError::InvalidComponent("RRULE without FREQ".into()))?;

    let mut rule = RecurrenceRule::new(model_frequency(frequency));
    if let Some(interval) = recur.interval {
        rule.set_interval(interval)?;
    }
    rule.set_rscale(recur.rscale.as_deref());
    if let Some(skip) = recur.skip {
        rule.set_skip(model_skip(skip));
    }
    if let Some(wkst) = recur.wkst {
        rule.set_first_day_of_week(model_weekday(wkst));
    }
    rule.set_by_day(
        recur
            .by_day
            .iter()
            .map(|d| match d.ordinal {
                Some(n) => NDay::nth(model_weekday(d.weekday), i32::from(n)),
                None => NDay::every(model_weekday(d.weekday)),
            })
            .collect(),
    )?;
    rule.set_by_month_day(recur.by_monthday.clone())?;
    rule.set_by_month(
        recur
            .by_month
            .iter()
            .map(|m| RuleMonth {
                month: m.month,
                leap: m.leap,
            })
            .collect(),
    )?;
    rule.set_by_year_day(recur.by_yearday.clone())?;
    rule.set_by_week_no(recur.by_weekno.clone())?;
    rule.set_by_hour(recur.by_hour.clone())?;
    rule.set_by_minute(recur.by_minute.clone())?;
    rule.set_by_second(recur.by_second.clone())?;
    rule.set_by_set_position(recur.by_setpos.iter().copied().map(i32::from).collect())?;

    if recur.count.is_some() && recur.until.is_some() {
        return Err(ModelError::from(RecurrenceConstraint::CountAndUntil).into());
    }
    if let Some(count) = recur.count {
        rule.set_count(count);
    }
    match &recur.until {
        Some(RRuleUntil::Date(date)) => rule.set_until(LocalDateTime::from_date(date.0)),
        Some(RRuleUntil::DateTime(dt)) => {
            let local = match (&dt.form, time_zone) {
                (DateTimeForm::Utc, Some(tz)) => {
                    utc_to_zone(&instant(dt), tz).unwrap_or(dt.local)
                }
                _ => dt.local,
            };
            rule.set_until(LocalDateTime::new(local));
        }
        None => {}
    }
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_are_not_written() {
        let rule = RecurrenceRule::new(Frequency::Weekly);
        let rrule = to_rrule(&rule, None).unwrap();
        assert_eq!(rrule.to_string(), "FREQ=WEEKLY");
    }

    #[test]
    fn full_rule_round_trip() {
        let mut rule = RecurrenceRule::new(Frequency::Monthly);
        rule.set_interval(2).unwrap();
        rule.set_by_day(vec![NDay::nth(Weekday::Fr, -1), NDay::every(Weekday::Mo)])
            .unwrap();
        rule.set_first_day_of_week(Weekday::Su);
        rule.set_count(6);

        let rrule = to_rrule(&rule, None).unwrap();
        assert_eq!(rrule.interval, Some(2));
        assert_eq!(rrule.wkst, Some(IcalWeekday::Sunday));
        assert_eq!(from_rrule(&rrule, None).unwrap(), rule);
    }

    #[test]
    fn rscale_and_skip() {
        let mut rule = RecurrenceRule::new(Frequency::Yearly);
        rule.set_rscale(Some("chinese"));
        rule.set_skip(Skip::Forward);
        rule.set_by_month(vec![RuleMonth::leap(5)]).unwrap();

        let rrule = to_rrule(&rule, None).unwrap();
        let text = rrule.to_string();
        assert!(text.contains("RSCALE=CHINESE"), "{text}");
        assert!(text.contains("SKIP=FORWARD"), "{text}");
        assert!(text.contains("BYMONTH=5L"), "{text}");

        let back = from_rrule(&rrule, None).unwrap();
        assert_eq!(back.rscale(), "chinese");
        assert_eq!(back.skip(), Skip::Forward);
        assert_eq!(back.by_month(), [RuleMonth::leap(5)]);
    }

    #[test]
    fn until_follows_start_form() {
        let mut rule = RecurrenceRule::new(Frequency::Daily);
        rule.set_until(LocalDateTime::new(day(2026, 1, 10).and_hms_opt(9, 0, 0).unwrap()));

        let date_start = DateOrDateTime::Date(Date(day(2026, 1, 1)));
        let rrule = to_rrule(&rule, Some(&date_start)).unwrap();
        assert_eq!(rrule.until, Some(RRuleUntil::Date(Date(day(2026, 1, 10)))));

        let zoned_start = DateOrDateTime::DateTime(DateTime::zoned(
            day(2026, 1, 1).and_hms_opt(9, 0, 0).unwrap(),
            "Europe/Berlin",
        ));
        let rrule = to_rrule(&rule, Some(&zoned_start)).unwrap();
        assert_eq!(
            rrule.until,
            Some(RRuleUntil::DateTime(DateTime::utc(
                day(2026, 1, 10).and_hms_opt(8, 0, 0).unwrap()
            )))
        );

        let back = from_rrule(&rrule, Some("Europe/Berlin")).unwrap();
        assert_eq!(back.until(), rule.until());
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let missing_freq = RRule::default();
        assert!(matches!(
            from_rrule(&missing_freq, None),
            Err(IcalError::InvalidComponent(_))
        ));

        let weekly_weekno = RRule {
            freq: Some(IcalFrequency::Weekly),
            by_weekno: vec![1],
            ..RRule::default()
        };
        assert!(matches!(
            from_rrule(&weekly_weekno, None),
            Err(IcalError::Model(_))
        ));
    }

    #[test]
    fn count_with_until_is_rejected() {
        let both = RRule {
            freq: Some(IcalFrequency::Daily),
            count: Some(3),
            until: Some(RRuleUntil::Date(Date(day(2026, 2, 1)))),
            ..RRule::default()
        };
        assert!(matches!(
            from_rrule(&both, None),
            Err(IcalError::Model(ModelError::RecurrenceConstraintViolation(
                RecurrenceConstraint::CountAndUntil
            )))
        ));
    }
}
