use serde_json::json;

use super::*;
use crate::error::RecurrenceConstraint;

fn violation(err: ModelError) -> RecurrenceConstraint {
    match err {
        ModelError::RecurrenceConstraintViolation(constraint) => constraint,
        other => panic!("expected a constraint violation, got {other:?}"),
    }
}

#[test]
fn by_week_no_requires_yearly() {
    for frequency in [
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
        Frequency::Hourly,
        Frequency::Minutely,
        Frequency::Secondly,
    ] {
        let mut rule = RecurrenceRule::new(frequency);
        let err = rule.set_by_week_no(vec![1, 20]).unwrap_err();
        assert_eq!(violation(err), RecurrenceConstraint::ByWeekNoRequiresYearly);
        assert!(rule.by_week_no().is_empty());
    }

    let mut yearly = RecurrenceRule::new(Frequency::Yearly);
    yearly.set_by_week_no(vec![20, 1]).unwrap();
    assert_eq!(yearly.by_week_no(), [1, 20]);
}

#[test]
fn nth_day_requires_monthly_or_yearly() {
    let mut weekly = RecurrenceRule::new(Frequency::Weekly);
    let err = weekly.set_by_day(vec![NDay::nth(Weekday::Mo, 1)]).unwrap_err();
    assert_eq!(violation(err), RecurrenceConstraint::NthDayRequiresMonthlyOrYearly);
    weekly.set_by_day(vec![NDay::every(Weekday::Mo)]).unwrap();

    let mut monthly = RecurrenceRule::new(Frequency::Monthly);
    monthly.set_by_day(vec![NDay::nth(Weekday::Fr, -1)]).unwrap();
}

#[test]
fn yearly_by_week_no_forbids_nth_day() {
    let mut rule = RecurrenceRule::new(Frequency::Yearly);
    rule.set_by_week_no(vec![10]).unwrap();
    let err = rule.set_by_day(vec![NDay::nth(Weekday::Tu, 2)]).unwrap_err();
    assert_eq!(violation(err), RecurrenceConstraint::NthDayWithByWeekNo);
    rule.set_by_day(vec![NDay::every(Weekday::Tu)]).unwrap();
}

#[test]
fn by_month_day_forbidden_when_weekly() {
    let mut rule = RecurrenceRule::new(Frequency::Weekly);
    let err = rule.set_by_month_day(vec![1]).unwrap_err();
    assert_eq!(violation(err), RecurrenceConstraint::ByMonthDayWithWeekly);

    let mut monthly = RecurrenceRule::new(Frequency::Monthly);
    monthly.set_by_month_day(vec![15, -1, 1]).unwrap();
    assert_eq!(monthly.by_month_day(), [-1, 1, 15]);
    let err = monthly.set_frequency(Frequency::Weekly).unwrap_err();
    assert_eq!(violation(err), RecurrenceConstraint::ByMonthDayWithWeekly);
    assert_eq!(monthly.frequency(), Frequency::Monthly);
}

#[test]
fn by_year_day_forbidden_for_short_frequencies() {
    for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
        let mut rule = RecurrenceRule::new(frequency);
        let err = rule.set_by_year_day(vec![100]).unwrap_err();
        assert_eq!(violation(err), RecurrenceConstraint::ByYearDayWithFrequency);
    }
    let mut hourly = RecurrenceRule::new(Frequency::Hourly);
    hourly.set_by_year_day(vec![1]).unwrap();
}

#[test]
fn count_and_until_keep_the_last_one_set() {
    let until: LocalDateTime = "2024-12-31T00:00:00".parse().unwrap();
    let mut rule = RecurrenceRule::new(Frequency::Daily);
    rule.set_count(5);
    rule.set_until(until);
    assert_eq!(rule.until(), Some(until));
    assert_eq!(rule.count(), None);

    rule.set_count(3);
    assert_eq!(rule.count(), Some(3));
    assert_eq!(rule.until(), None);
}

#[test]
fn by_day_ordering() {
    let mut rule = RecurrenceRule::new(Frequency::Monthly);
    rule.set_by_day(vec![
        NDay::nth(Weekday::Mo, 2),
        NDay::every(Weekday::Su),
        NDay::nth(Weekday::Mo, 1),
        NDay::every(Weekday::Mo),
        NDay::nth(Weekday::We, 3),
    ])
    .unwrap();
    let order: Vec<_> = rule
        .by_day()
        .iter()
        .map(|d| (d.day, d.nth_of_period))
        .collect();
    assert_eq!(
        order,
        [
            (Weekday::Mo, None),
            (Weekday::Mo, Some(1)),
            (Weekday::Mo, Some(2)),
            (Weekday::We, Some(3)),
            (Weekday::Su, None),
        ]
    );
}

#[test]
fn by_month_ordering_puts_leap_after_plain() {
    let mut rule = RecurrenceRule::new(Frequency::Yearly);
    rule.set_by_month(vec![RuleMonth::leap(5), RuleMonth::new(12), RuleMonth::new(5)])
        .unwrap();
    let text: Vec<_> = rule.by_month().iter().map(ToString::to_string).collect();
    assert_eq!(text, ["5", "5L", "12"]);
}

#[test]
fn ranges_are_checked() {
    let mut rule = RecurrenceRule::new(Frequency::Daily);
    assert!(matches!(
        rule.set_by_hour(vec![24]),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(rule.set_interval(0).is_err());
    assert!(rule.set_by_set_position(vec![0]).is_err());
}

#[test]
fn wire_form_round_trip() {
    let wire = json!({
        "@type": "RecurrenceRule",
        "frequency": "yearly",
        "interval": 2,
        "rscale": "chinese",
        "skip": "forward",
        "firstDayOfWeek": "su",
        "byDay": [{"@type": "NDay", "day": "mo", "nthOfPeriod": 1}],
        "byMonth": ["5L"],
        "count": 10
    });
    let rule: RecurrenceRule = serde_json::from_value(wire.clone()).unwrap();
    assert_eq!(rule.rscale(), "chinese");
    assert_eq!(rule.count(), Some(10));
    assert_eq!(serde_json::to_value(&rule).unwrap(), wire);
}

#[test]
fn wire_defaults_are_omitted() {
    let rule = RecurrenceRule::new(Frequency::Weekly);
    assert_eq!(
        serde_json::to_value(&rule).unwrap(),
        json!({"@type": "RecurrenceRule", "frequency": "weekly"})
    );
}

#[test]
fn wire_form_is_validated() {
    let weekly_month_day = json!({"frequency": "weekly", "byMonthDay": [1]});
    assert!(serde_json::from_value::<RecurrenceRule>(weekly_month_day).is_err());

    let both_ends = json!({"frequency": "daily", "count": 2, "until": "2024-01-01T00:00:00"});
    assert!(serde_json::from_value::<RecurrenceRule>(both_ends).is_err());

    let unsorted = json!({"frequency": "monthly", "byMonthDay": [20, 3]});
    let rule: RecurrenceRule = serde_json::from_value(unsorted).unwrap();
    assert_eq!(rule.by_month_day(), [3, 20]);
}
