//! Domain checks run before an object is deserialized.
//!
//! serde only carries failures as text. Temporal values and recurrence rules
//! are read here first, so a bad date or an invalid rule reaches the caller
//! as `InvalidTemporalInput` or `RecurrenceConstraintViolation` instead of a
//! generic parse error. Values of the wrong JSON type are left to serde.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::ObjectType;
use crate::entity::marker::{AbsoluteTriggerType, OffsetTriggerType};
use crate::error::{ModelError, ModelResult};
use crate::recurrence::RecurrenceRule;
use crate::recurrence::wire::RuleWire;
use crate::temporal::{Duration, LocalDateTime, UtcDateTime};

type Object = Map<String, Value>;

const LOCAL_KEYS: [&str; 3] = ["start", "due", "recurrenceId"];
const UTC_KEYS: [&str; 5] = [
    "created",
    "updated",
    "progressUpdated",
    "scheduleUpdated",
    "validUntil",
];
const DURATION_KEYS: [&str; 2] = ["duration", "estimatedDuration"];
const RULE_KEYS: [&str; 2] = ["recurrenceRules", "excludedRecurrenceRules"];

/// ## Summary
/// Reads the temporal values and recurrence rules of `value`, an object of
/// `object_type`.
///
/// ## Errors
/// Returns `InvalidTemporalInput` for malformed date-time or duration text
/// and `RecurrenceConstraintViolation` for a rule that breaks a constraint.
pub(super) fn check(object_type: ObjectType, value: &Value) -> ModelResult<()> {
    let Value::Object(object) = value else {
        return Ok(());
    };
    match object_type {
        ObjectType::Group => group(object),
        ObjectType::Event | ObjectType::Task | ObjectType::TimeZoneRule => scheduled(object),
        ObjectType::Alert => alert(object),
        ObjectType::AbsoluteTrigger | ObjectType::OffsetTrigger => trigger(object),
        ObjectType::Participant => utc_values(object),
        ObjectType::RecurrenceRule => rule(value),
        ObjectType::TimeZone => time_zone(object),
        _ => Ok(()),
    }
}

fn strings<'a>(object: &'a Object, keys: &'a [&str]) -> impl Iterator<Item = &'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
}

/// The objects held by an array or by the values of a map under `key`.
fn objects<'a>(object: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> + use<'a> {
    let values: Box<dyn Iterator<Item = &'a Value> + 'a> = match object.get(key) {
        Some(Value::Array(items)) => Box::new(items.iter()),
        Some(Value::Object(map)) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    };
    values.filter_map(Value::as_object)
}

fn utc_values(object: &Object) -> ModelResult<()> {
    for text in strings(object, &UTC_KEYS) {
        text.parse::<UtcDateTime>().map_err(ModelError::temporal)?;
    }
    Ok(())
}

fn group(object: &Object) -> ModelResult<()> {
    utc_values(object)?;
    for entry in objects(object, "entries") {
        if matches!(entry.get("@type").and_then(Value::as_str), Some("Event" | "Task")) {
            scheduled(entry)?;
        }
    }
    Ok(())
}

fn scheduled(object: &Object) -> ModelResult<()> {
    for text in strings(object, &LOCAL_KEYS) {
        text.parse::<LocalDateTime>()?;
    }
    for text in strings(object, &DURATION_KEYS) {
        text.parse::<Duration>()?;
    }
    utc_values(object)?;
    for key in RULE_KEYS {
        if let Some(Value::Array(rules)) = object.get(key) {
            for value in rules {
                rule(value)?;
            }
        }
    }
    if let Some(Value::Object(overrides)) = object.get("recurrenceOverrides") {
        for key in overrides.keys() {
            key.parse::<LocalDateTime>()?;
        }
    }
    for alert_object in objects(object, "alerts") {
        alert(alert_object)?;
    }
    for participant in objects(object, "participants") {
        utc_values(participant)?;
    }
    for zone in objects(object, "timeZones") {
        time_zone(zone)?;
    }
    Ok(())
}

fn alert(object: &Object) -> ModelResult<()> {
    if let Some(acknowledged) = object.get("acknowledged").and_then(Value::as_str) {
        acknowledged.parse::<UtcDateTime>().map_err(ModelError::temporal)?;
    }
    match object.get("trigger") {
        Some(Value::Object(trigger_object)) => trigger(trigger_object),
        _ => Ok(()),
    }
}

fn trigger(object: &Object) -> ModelResult<()> {
    match object.get("@type").and_then(Value::as_str) {
        Some(OffsetTriggerType::NAME) => {
            if let Some(offset) = object.get("offset").and_then(Value::as_str) {
                offset.parse::<Duration>()?;
            }
        }
        Some(AbsoluteTriggerType::NAME) => {
            if let Some(when) = object.get("when").and_then(Value::as_str) {
                when.parse::<UtcDateTime>().map_err(ModelError::temporal)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn time_zone(object: &Object) -> ModelResult<()> {
    utc_values(object)?;
    for observance in objects(object, "standard").chain(objects(object, "daylight")) {
        scheduled(observance)?;
    }
    Ok(())
}

/// A rule whose parts have the right JSON types still has to pass the
/// cross-field checks of [`RecurrenceRule`].
fn rule(value: &Value) -> ModelResult<()> {
    if let Some(until) = value.get("until").and_then(Value::as_str) {
        until.parse::<LocalDateTime>()?;
    }
    if let Ok(wire) = RuleWire::deserialize(value) {
        RecurrenceRule::try_from(wire)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::RecurrenceConstraint;

    #[test]
    fn nested_rule_is_checked() {
        let event = json!({
            "@type": "Event",
            "uid": "e",
            "recurrenceRules": [{"@type": "RecurrenceRule", "frequency": "daily", "count": 2, "until": "2026-01-01T00:00:00"}]
        });
        assert!(matches!(
            check(ObjectType::Event, &event),
            Err(ModelError::RecurrenceConstraintViolation(
                RecurrenceConstraint::CountAndUntil
            ))
        ));
    }

    #[test]
    fn group_entries_and_alerts_are_checked() {
        let group = json!({
            "@type": "Group",
            "uid": "g",
            "entries": [{
                "@type": "Task",
                "uid": "t",
                "alerts": {"a": {"@type": "Alert", "trigger": {"@type": "OffsetTrigger", "offset": "soon"}}}
            }]
        });
        assert!(matches!(
            check(ObjectType::Group, &group),
            Err(ModelError::InvalidTemporalInput(_))
        ));
    }

    #[test]
    fn wrong_json_types_are_left_to_serde() {
        let event = json!({"@type": "Event", "uid": "e", "start": 5, "recurrenceRules": [{"frequency": 1}]});
        assert!(check(ObjectType::Event, &event).is_ok());
        assert!(check(ObjectType::Link, &json!({"href": "x", "start": "nope"})).is_ok());
    }
}
