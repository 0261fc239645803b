//! Alerts to VALARM components.

use jscal_core::constants::DEFAULT_ALARM_DESCRIPTION;
use jscal_model::entity::{Alert, AlertAction, Trigger};
use jscal_model::json::raw;
use jscal_rfc::ical::core::{
    Component, ComponentKind, Duration as IcalDuration, Parameter, Property, names, param_names,
};

use super::{has_only, relation_lines};
use crate::error::IcalResult;
use crate::map::values::{ical_duration, ical_instant};

/// TRIGGER for `trigger`, or `None` when only the JSON form is exact.
fn trigger_line(trigger: &Trigger) -> Option<Property> {
    match trigger {
        Trigger::Offset(offset) => {
            let duration = ical_duration(&offset.offset)?;
            Some(
                Property::duration(names::TRIGGER, duration).with_opt_param(
                    param_names::RELATED,
                    offset.relative_to.as_deref().map(str::to_ascii_uppercase),
                ),
            )
        }
        Trigger::Absolute(absolute) if absolute.when.timestamp_subsec_nanos() == 0 => Some(
            Property::datetime(names::TRIGGER, ical_instant(&absolute.when))
                .with_param(Parameter::value_type("DATE-TIME")),
        ),
        Trigger::Absolute(_) | Trigger::Unknown(_) => None,
    }
}

/// ## Summary
/// Writes alert `id` as a VALARM. `title` of the owning object becomes the
/// alarm text. Returns whether the component expresses the alert fully.
///
/// Triggers iCalendar cannot carry exactly are written as a zero offset
/// plus an `X-JSCAL-TRIGGER` line holding the JSON trigger.
///
/// ## Errors
/// Fails when the trigger cannot be serialized.
pub(super) fn write(id: &str, alert: &Alert, title: Option<&str>) -> IcalResult<(Component, bool)> {
    let mut alarm = Component::new(ComponentKind::Alarm);
    alarm.add_property(Property::text(names::UID, id));
    let action = alert.action();
    alarm.add_property(Property::text(
        names::ACTION,
        match action {
            AlertAction::Display => "DISPLAY",
            AlertAction::Email => "EMAIL",
        },
    ));

    if let Some(line) = trigger_line(&alert.trigger) {
        alarm.add_property(line);
    } else {
        tracing::debug!(%id, "Trigger carried as JSON");
        alarm.add_property(Property::duration(names::TRIGGER, IcalDuration::zero()));
        alarm.add_property(Property::text(
            names::X_JSCAL_TRIGGER,
            raw::encode(&raw::to_value(&alert.trigger)?, false)?,
        ));
    }

    let text = title.unwrap_or(DEFAULT_ALARM_DESCRIPTION);
    alarm.add_property(Property::text(names::DESCRIPTION, text));
    if action == AlertAction::Email {
        alarm.add_property(Property::text(names::SUMMARY, text));
    }

    let mut covered = has_only(alert, &["trigger", "acknowledged", "relatedTo", "action"])
        && alert.action != Some(AlertAction::Display);
    if let Some(acknowledged) = &alert.acknowledged {
        alarm.add_property(Property::datetime(
            names::ACKNOWLEDGED,
            ical_instant(acknowledged),
        ));
        covered &= acknowledged.timestamp_subsec_nanos() == 0;
    }
    let (lines, relations_covered) = relation_lines(&alert.related_to);
    for line in lines {
        alarm.add_property(line);
    }
    Ok((alarm, covered && relations_covered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscal_model::Duration;
    use jscal_model::entity::OffsetTrigger;

    #[test]
    fn offset_trigger_line() {
        let mut offset = OffsetTrigger::new(Duration::hms(0, 15, 0).negated());
        offset.relative_to = Some("end".to_string());
        let line = trigger_line(&Trigger::Offset(offset)).unwrap();
        assert_eq!(line.raw_value, "-PT15M");
        assert_eq!(line.get_param_value(param_names::RELATED), Some("END"));
    }

    #[test]
    fn nominal_offset_needs_json() {
        let offset = OffsetTrigger::new(Duration {
            months: 1,
            ..Duration::default()
        });
        assert!(trigger_line(&Trigger::Offset(offset)).is_none());

        let (alarm, covered) = write(
            "a1",
            &Alert::new(Trigger::Offset(OffsetTrigger::new(Duration {
                months: 1,
                ..Duration::default()
            }))),
            None,
        )
        .unwrap();
        assert!(covered);
        assert!(alarm.get_property(names::X_JSCAL_TRIGGER).is_some());
        assert_eq!(alarm.text_of(names::DESCRIPTION), Some("Reminder"));
    }
}
