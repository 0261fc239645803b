//! Behavioural properties of the model that span several modules.

use jscal_model::entity::Scheduled;
use jscal_model::error::RecurrenceConstraint;
use jscal_model::json::{self, JsObject};
use jscal_model::patch::{PatchObject, PatchTarget};
use jscal_model::recurrence::{Frequency, RecurrenceRule};
use jscal_model::temporal::{Duration, decode_duration, encode_duration};
use jscal_model::{Event, ModelError};
use serde_json::json;

#[test]
fn week_multiples_round_trip_through_week_form() {
    for days in (7..=700).step_by(7) {
        let duration = Duration::days(days);
        let text = encode_duration(&duration);
        assert_eq!(text, format!("P{}W", days / 7));
        assert_eq!(decode_duration(&text).unwrap(), duration);
    }
}

#[test]
fn non_day_components_never_use_weeks() {
    for hours in 1..24 {
        for days in [0, 7, 14, 3] {
            let duration = Duration {
                days,
                hours,
                ..Duration::zero()
            };
            assert!(!encode_duration(&duration).contains('W'));
        }
    }
    assert_eq!(encode_duration(&Duration::zero()), "PT0H0M0S");
}

#[test]
fn by_week_no_fails_for_every_non_yearly_frequency() {
    for frequency in [
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
        Frequency::Hourly,
        Frequency::Minutely,
        Frequency::Secondly,
    ] {
        let result = RecurrenceRule::new(frequency).set_by_week_no(vec![1]);
        assert!(matches!(
            result,
            Err(ModelError::RecurrenceConstraintViolation(
                RecurrenceConstraint::ByWeekNoRequiresYearly
            ))
        ));
    }
}

#[test]
fn weekly_rule_with_month_day_fails_validation() {
    let text = r#"{"@type": "RecurrenceRule", "frequency": "weekly", "byMonthDay": [1]}"#;
    let err = json::parse(text).unwrap_err();
    assert!(
        matches!(
            err,
            ModelError::RecurrenceConstraintViolation(RecurrenceConstraint::ByMonthDayWithWeekly)
        ),
        "{err}"
    );
    assert_eq!(err.code(), "model.recurrence_constraint");
    assert!(err.to_string().contains("byMonthDay"), "{err}");
}

#[test]
fn nested_rule_violation_keeps_its_kind() {
    let text = r#"{"@type": "Event", "uid": "e", "start": "2026-01-05T09:00:00",
        "recurrenceRules": [{"@type": "RecurrenceRule", "frequency": "weekly", "byMonthDay": [1]}]}"#;
    assert!(matches!(
        json::parse_entity(text),
        Err(ModelError::RecurrenceConstraintViolation(_))
    ));
}

#[test]
fn malformed_temporal_text_is_invalid_temporal_input() {
    let bad_start = r#"{"@type": "Event", "uid": "e", "start": "yesterday"}"#;
    let err = json::parse(bad_start).unwrap_err();
    assert!(matches!(err, ModelError::InvalidTemporalInput(_)), "{err}");
    assert_eq!(err.code(), "model.invalid_temporal_input");

    let bad_duration = r#"{"@type": "Event", "uid": "e", "start": "2026-01-05T09:00:00", "duration": "P1DT"}"#;
    assert!(matches!(
        json::parse(bad_duration),
        Err(ModelError::InvalidTemporalInput(_))
    ));

    let bad_override = r#"{"@type": "Task", "uid": "t", "recurrenceOverrides": {"soon": {}}}"#;
    assert!(matches!(
        json::parse(bad_override),
        Err(ModelError::InvalidTemporalInput(_))
    ));
}

#[test]
fn shape_errors_stay_parse_errors() {
    let err = json::parse(r#"{"@type": "Event", "uid": 7}"#).unwrap_err();
    assert_eq!(err.code(), json::raw::PARSE_ERROR_CODE);
}

#[test]
fn override_patch_cannot_change_uid() {
    let base = json!({"@type": "Event", "uid": "series", "title": "Base"});
    let mut patch = PatchObject::new();
    patch.insert("uid", json!("replacement"));
    let applied = patch.apply(&base, PatchTarget::RecurrenceOverride).unwrap();
    assert_eq!(applied["uid"], "series");
}

#[test]
fn parsed_event_materializes_occurrences() {
    let text = r#"{
        "@type": "Event",
        "uid": "series",
        "title": "Base",
        "start": "2024-01-01T09:00:00",
        "recurrenceRules": [{"@type": "RecurrenceRule", "frequency": "daily"}],
        "recurrenceOverrides": {"2024-01-02T09:00:00": {"title": "Second", "uid": "x"}}
    }"#;
    let JsObject::Event(event) = json::parse(text).unwrap() else {
        panic!("expected an event");
    };
    let second = event
        .occurrence("2024-01-02T09:00:00".parse().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(second.common.title(), Some("Second"));
    assert_eq!(second.common.uid, "series");

    let written = json::write(&JsObject::Event(second), false).unwrap();
    assert!(written.contains("\"recurrenceId\":\"2024-01-02T09:00:00\""));
    assert!(!written.contains("recurrenceRules"));
    let _: Event = serde_json::from_str(&written).unwrap();
}
