//! VALARM components to alerts.

use jscal_core::util::id::is_valid_id;
use jscal_model::entity::{AbsoluteTrigger, Alert, AlertAction, OffsetTrigger, Trigger};
use jscal_model::json::raw;
use jscal_rfc::ical::core::{Component, Property, names, param_names};

use super::{instant_of, relations};
use crate::error::IcalResult;
use crate::map::values::{instant, model_duration};

fn trigger(alarm: &Component) -> IcalResult<Trigger> {
    if let Some(text) = alarm
        .get_property(names::X_JSCAL_TRIGGER)
        .and_then(Property::as_text)
    {
        return Ok(raw::from_value(raw::decode(text)?)?);
    }

    let Some(prop) = alarm.get_property(names::TRIGGER) else {
        tracing::warn!("VALARM without TRIGGER, firing at start");
        return Ok(Trigger::default());
    };
    if let Some(duration) = prop.as_duration() {
        let mut offset = OffsetTrigger::new(model_duration(duration));
        offset.relative_to = prop
            .get_param_value(param_names::RELATED)
            .map(str::to_ascii_lowercase);
        return Ok(Trigger::Offset(offset));
    }
    if let Some(when) = prop.as_datetime() {
        return Ok(Trigger::Absolute(AbsoluteTrigger::new(instant(when))));
    }
    tracing::warn!(value = %prop.raw_value, "Unreadable TRIGGER, firing at start");
    Ok(Trigger::default())
}

/// ## Summary
/// Reads one VALARM; `position` numbers alarms without a usable UID.
///
/// ## Errors
/// Fails when an `X-JSCAL-TRIGGER` value is not a trigger object.
pub(super) fn read(alarm: &Component, position: usize) -> IcalResult<(String, Alert)> {
    let id = alarm
        .uid()
        .filter(|uid| is_valid_id(uid))
        .map_or_else(|| format!("alert-{}", position + 1), str::to_string);

    let mut alert = Alert::new(trigger(alarm)?);
    // Anything but EMAIL is shown to the user.
    alert.action = alarm
        .text_of(names::ACTION)
        .is_some_and(|action| action.eq_ignore_ascii_case("EMAIL"))
        .then_some(AlertAction::Email);
    alert.acknowledged = instant_of(alarm, names::ACKNOWLEDGED);
    alert.related_to = relations(alarm);
    Ok((id, alert))
}
