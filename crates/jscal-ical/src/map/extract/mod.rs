//! Reading iCalendar components into model objects.

mod alarm;
mod participant;
mod place;
pub(super) mod timezone;

pub(super) use participant::send_method;
pub(super) use place::geo_uri;

use std::collections::BTreeMap;

use jscal_core::util::id::{generate_id, is_valid_id};
use jscal_model::entity::{Common, Link, Relation, Schedule};
use jscal_model::json::raw;
use jscal_model::{Entry, Event, Group, PatchObject, Task};
use jscal_rfc::ical::core::{
    Component, ComponentKind, DateOrDateTime, Property, names, param_names,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::rrule::from_rrule;
use super::values::{Anchored, instant, local_in};
use super::{CalendarInfo, Mapped};
use crate::error::IcalResult;

/// The UID of `component`; a missing UID is replaced by a fresh one.
pub(super) fn read_uid(component: &Component) -> String {
    component.uid().map_or_else(
        || {
            let uid = generate_id();
            tracing::warn!(component = %component.name, %uid, "Component without UID");
            uid
        },
        str::to_string,
    )
}

pub(super) fn instant_of(component: &Component, name: &str) -> Option<jscal_model::UtcDateTime> {
    component
        .get_property(name)
        .and_then(Property::as_datetime)
        .map(instant)
}

pub(super) fn integer_of<T: TryFrom<i32>>(component: &Component, name: &str) -> Option<T> {
    component
        .get_property(name)
        .and_then(Property::as_integer)
        .and_then(|n| T::try_from(n).ok())
}

/// Id from `X-JSID` when usable, else `<prefix>-<position>`.
pub(super) fn object_id(prop: &Property, prefix: &str, position: usize) -> String {
    prop.jsid()
        .filter(|id| is_valid_id(id))
        .map_or_else(|| format!("{prefix}-{}", position + 1), str::to_string)
}

/// ## Summary
/// Reads the metadata shared by every calendar object.
pub(super) fn read_common(component: &Component, calendar: &CalendarInfo, common: &mut Common) {
    common.prod_id.clone_from(&calendar.prod_id);
    common.created = instant_of(component, names::CREATED);
    common.updated = instant_of(component, names::DTSTAMP)
        .or_else(|| instant_of(component, names::LAST_MODIFIED));

    if let Some(summary) = component.get_property(names::SUMMARY) {
        common.set_title(summary.as_text());
        common.set_locale(summary.get_param_value(param_names::LANGUAGE));
    }
    if let Some(styled) = component.get_property(names::STYLED_DESCRIPTION) {
        common.set_description(styled.as_uri());
        common.description_content_type = styled
            .get_param_value(param_names::FMTTYPE)
            .map(str::to_string);
    } else {
        common.set_description(component.text_of(names::DESCRIPTION));
    }

    for prop in component.get_properties(names::CATEGORIES) {
        for keyword in prop.text_values() {
            common.add_keyword(keyword);
        }
    }
    for prop in component.get_properties(names::CONCEPT) {
        if let Some(category) = prop.as_uri() {
            common.add_category(category);
        }
    }
    common.set_color(component.text_of(names::COLOR));

    for (position, prop) in component.get_properties(names::LINK).into_iter().enumerate() {
        let Some(href) = prop.as_uri() else {
            continue;
        };
        let mut link = Link::new(href);
        link.content_type = prop.get_param_value(param_names::FMTTYPE).map(str::to_string);
        link.size = prop
            .get_param_value(param_names::SIZE)
            .and_then(|s| s.parse().ok());
        link.rel = prop
            .get_param_value(param_names::REL)
            .map(str::to_ascii_lowercase);
        link.display = prop
            .get_param_value(param_names::DISPLAY)
            .map(str::to_ascii_lowercase);
        link.title = prop.get_param_value(param_names::LABEL).map(str::to_string);
        common.links.insert(object_id(prop, "link", position), link);
    }
}

/// `RELATED-TO` lines by UID; a missing `RELTYPE` means `parent`.
pub(super) fn relations(component: &Component) -> BTreeMap<String, Relation> {
    let mut related = BTreeMap::<String, Relation>::new();
    for prop in component.get_properties(names::RELATED_TO) {
        let Some(uid) = prop.as_text() else {
            continue;
        };
        let kind = prop
            .get_param_value(param_names::RELTYPE)
            .map_or_else(|| "parent".to_string(), str::to_ascii_lowercase);
        related
            .entry(uid.to_string())
            .or_default()
            .relation
            .insert(kind, true);
    }
    related
}

/// ## Summary
/// Reads the scheduling properties shared by events and tasks.
///
/// `time_zone` is the zone of the object's start; recurrence dates are
/// expressed in it.
///
/// ## Errors
/// Fails on an invalid recurrence rule or a malformed extension value.
pub(super) fn read_schedule(
    component: &Component,
    time_zone: Option<&str>,
    schedule: &mut Schedule,
) -> IcalResult<()> {
    schedule.sequence = integer_of(component, names::SEQUENCE).unwrap_or_default();
    schedule.priority = integer_of(component, names::PRIORITY).unwrap_or_default();
    schedule.privacy = component.text_of(names::CLASS).and_then(super::codes::privacy);
    schedule.free_busy_status = component
        .text_of(names::TRANSP)
        .and_then(super::codes::free_busy);
    schedule.excluded = component
        .get_property(names::X_JSCAL_EXCLUDED)
        .is_some_and(|p| p.raw_value.eq_ignore_ascii_case("TRUE"));

    for prop in component.get_properties(names::RRULE) {
        if let Some(rrule) = prop.as_recur() {
            schedule.recurrence_rules.push(from_rrule(rrule, time_zone)?);
        }
    }
    for prop in component.get_properties(names::EXRULE) {
        if let Some(rrule) = prop.as_recur() {
            schedule
                .excluded_recurrence_rules
                .push(from_rrule(rrule, time_zone)?);
        }
    }
    for prop in component.get_properties(names::RDATE) {
        for date in prop.date_values() {
            schedule
                .recurrence_overrides
                .entry(local_in(&date, time_zone))
                .or_default();
        }
    }
    for prop in component.get_properties(names::EXDATE) {
        for date in prop.date_values() {
            let mut patch = PatchObject::new();
            patch.insert("excluded", Value::Bool(true));
            schedule.add_recurrence_override(local_in(&date, time_zone), patch);
        }
    }
    if let Some(recurrence_id) = component
        .get_property(names::RECURRENCE_ID)
        .and_then(Property::as_date_or_datetime)
    {
        let anchored = Anchored::from(&recurrence_id);
        schedule.recurrence_id = Some(anchored.local);
        if anchored.time_zone.as_deref() != time_zone {
            schedule.recurrence_id_time_zone = anchored.time_zone;
        }
    }

    schedule.related_to = relations(component);
    participant::read(component, schedule);
    place::read(component, schedule);

    for (position, child) in component.alarms().into_iter().enumerate() {
        let (id, alert) = alarm::read(child, position)?;
        schedule.alerts.insert(id, alert);
    }

    for prop in component.get_properties(names::X_JSCAL_LOCALIZATION) {
        let (Some(language), Some(text)) = (
            prop.get_param_value(param_names::LANGUAGE),
            prop.as_text(),
        ) else {
            tracing::warn!("Skipping localization without language");
            continue;
        };
        let patch: PatchObject = raw::from_value(raw::decode(text)?)?;
        schedule.add_localization(language, patch);
    }
    Ok(())
}

/// ## Summary
/// Applies the `X-JSCAL-PROPERTY` lines of `component` onto `item`.
///
/// Each line names a top-level JSON property in `X-JSID` and carries its
/// JSON value.
///
/// ## Errors
/// Fails when a value is not JSON or the result no longer has the shape of
/// `T`.
pub(super) fn with_extras<T>(component: &Component, item: T) -> IcalResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let extras: Vec<(&str, &str)> = component
        .get_properties(names::X_JSCAL_PROPERTY)
        .into_iter()
        .filter_map(|p| Some((p.jsid()?, p.as_text()?)))
        .collect();
    if extras.is_empty() {
        return Ok(item);
    }

    let mut value = raw::to_value(&item)?;
    if let Value::Object(map) = &mut value {
        for (key, text) in extras {
            map.insert(key.to_string(), raw::decode(text)?);
        }
    }
    Ok(raw::from_value(value)?)
}

/// ## Summary
/// Reads the calendar-level properties of a group: UID, NAME, SOURCE and
/// its extension lines.
///
/// ## Errors
/// Fails on a malformed extension value.
pub(super) fn read_group(root: &Component, calendar: &CalendarInfo) -> IcalResult<Group> {
    let mut group = Group::new(root.uid().map_or_else(generate_id, str::to_string));
    group.common.prod_id.clone_from(&calendar.prod_id);
    group.common.set_title(root.text_of(names::NAME));
    group.source = root
        .get_property(names::SOURCE)
        .and_then(Property::as_uri)
        .map(str::to_string);
    with_extras(root, group)
}

/// ## Summary
/// Turns an override component into a patch on its series.
///
/// The series is the entry with the same UID and component kind and no
/// recurrence id. The patch holds what differs between the override and the
/// occurrence the series would produce on its own. An override without a
/// series becomes an entry of its own.
///
/// ## Errors
/// Fails when the component cannot be read or the series' occurrence cannot
/// be materialized.
pub(super) fn fold_override(
    entries: &mut Vec<Entry>,
    component: &Component,
    calendar: &CalendarInfo,
) -> IcalResult<()> {
    let Some(recurrence_id) = component
        .get_property(names::RECURRENCE_ID)
        .and_then(Property::as_date_or_datetime)
    else {
        return Ok(());
    };
    let uid = component.uid();
    let series = entries.iter().position(|entry| {
        Some(entry.uid()) == uid
            && entry.schedule().recurrence_id.is_none()
            && matches!(
                (entry, component.kind),
                (Entry::Event(_), Some(ComponentKind::Event))
                    | (Entry::Task(_), Some(ComponentKind::Todo))
            )
    });

    let Some(index) = series else {
        tracing::debug!(?uid, "Override without series, keeping it as an entry");
        let entry: Entry = match component.kind {
            Some(ComponentKind::Todo) => Task::read(component, calendar)?.into(),
            _ => Event::read(component, calendar)?.into(),
        };
        entries.push(entry);
        return Ok(());
    };

    match entries.get_mut(index) {
        Some(Entry::Event(series)) => {
            let occurrence = Event::read(component, calendar)?;
            fold(series, occurrence, &recurrence_id)
        }
        Some(Entry::Task(series)) => {
            let occurrence = Task::read(component, calendar)?;
            fold(series, occurrence, &recurrence_id)
        }
        None => Ok(()),
    }
}

fn fold<T: Mapped>(
    series: &mut T,
    mut occurrence: T,
    recurrence_id: &DateOrDateTime,
) -> IcalResult<()> {
    let key = local_in(recurrence_id, series.schedule().time_zone.as_deref());
    // An EXDATE for the same instant is superseded by the override.
    series.schedule_mut().recurrence_overrides.remove(&key);
    let Some(base) = series.occurrence(key)? else {
        return Ok(());
    };
    // The key already carries the recurrence id zone.
    occurrence.schedule_mut().recurrence_id = Some(key);
    occurrence
        .schedule_mut()
        .recurrence_id_time_zone
        .clone_from(&base.schedule().recurrence_id_time_zone);

    let patch = PatchObject::diff(&raw::to_value(&base)?, &raw::to_value(&occurrence)?)
        .for_recurrence_override();
    tracing::debug!(
        uid = %series.common().uid,
        recurrence_id = %key,
        changes = patch.len(),
        "Folded recurrence override"
    );
    series.schedule_mut().add_recurrence_override(key, patch);
    Ok(())
}
