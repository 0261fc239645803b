//! Mapping between iCalendar components and the JSON calendar model.
//!
//! ## Summary
//! [`extract`] reads components into events and tasks, [`assemble`] writes
//! them back. Properties without an iCalendar counterpart travel in
//! `X-JSCAL-PROPERTY` lines keyed by their JSON name, so a model object
//! written and read again comes back unchanged.

mod assemble;
mod codes;
mod extract;
mod kinds;
mod rrule;
mod values;

#[cfg(test)]
mod tests;

use jscal_core::config::is_reserved;
use jscal_model::entity::Scheduled;
use jscal_model::{Entry, Event, JsEntity, Task, UtcDateTime};
use jscal_rfc::ical::core::{Component, ComponentKind, DateOrDateTime, ICalendar, names};
use jscal_rfc::ical::{parse, serialize};

use crate::config::{IcalConfig, ParseOptions};
use crate::error::{IcalError, IcalResult};

pub(crate) use assemble::Assembler;

/// Calendar-level values that every entry inherits when read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CalendarInfo {
    pub prod_id: Option<String>,
    pub method: Option<String>,
}

impl CalendarInfo {
    fn of(calendar: &ICalendar) -> Self {
        Self {
            prod_id: calendar.prodid().map(str::to_string),
            method: calendar.method().map(str::to_ascii_lowercase),
        }
    }
}

/// Values fixed for one build, shared by every written component.
#[derive(Debug, Clone)]
pub(crate) struct BuildContext {
    pub prod_id: String,
    pub method: Option<String>,
    /// `DTSTAMP` of objects that carry no `updated`.
    pub now: UtcDateTime,
}

/// An event or task stored in one kind of iCalendar component.
pub(crate) trait Mapped: Scheduled {
    const KIND: ComponentKind;

    /// ## Summary
    /// Reads one VEVENT or VTODO, without folding overrides.
    ///
    /// ## Errors
    /// Fails when a property value breaks a model invariant.
    fn read(component: &Component, calendar: &CalendarInfo) -> IcalResult<Self>;

    /// ## Summary
    /// Writes the properties specific to this kind.
    ///
    /// ## Errors
    /// Fails when a value cannot be expressed in iCalendar.
    fn write_own(&self, asm: &mut Assembler<'_>) -> IcalResult<()>;

    /// The value that fixes the form of recurrence dates: DTSTART, or DUE
    /// for a task without start.
    fn anchor(&self) -> Option<DateOrDateTime>;

    fn new_component() -> Component {
        Component::new(Self::KIND)
    }
}

fn count_kinds(entries: &[Entry]) -> (usize, usize) {
    entries.iter().fold((0, 0), |(events, tasks), entry| match entry {
        Entry::Event(_) => (events + 1, tasks),
        Entry::Task(_) => (events, tasks + 1),
    })
}

/// ## Summary
/// Reads a parsed iCalendar object into a `Group`, `Event` or `Task`.
///
/// Components that repeat the UID of a series with a RECURRENCE-ID are
/// folded into that series' `recurrenceOverrides`. A single event or task
/// comes back as itself unless `options.force_group` is set; anything else
/// becomes a group. Time zone definitions referenced by an entry are copied
/// into its `timeZones`.
///
/// ## Errors
/// Returns `EmptyCalendar` when there is no VEVENT or VTODO, and a model or
/// component error when a value cannot be read.
#[tracing::instrument(skip(calendar), fields(components = calendar.root.children.len()))]
pub fn ical_parse(calendar: &ICalendar, options: &ParseOptions) -> IcalResult<JsEntity> {
    let info = CalendarInfo::of(calendar);
    let zones = extract::timezone::harvest(calendar)?;

    let mut entries: Vec<Entry> = Vec::new();
    let mut overrides = Vec::new();
    for component in &calendar.root.children {
        let is_override = component.get_property(names::RECURRENCE_ID).is_some();
        match component.kind {
            Some(ComponentKind::Event | ComponentKind::Todo) if is_override => {
                overrides.push(component);
            }
            Some(ComponentKind::Event) => entries.push(Event::read(component, &info)?.into()),
            Some(ComponentKind::Todo) => entries.push(Task::read(component, &info)?.into()),
            Some(ComponentKind::Timezone) => {}
            _ => tracing::debug!(component = %component.name, "Ignoring component"),
        }
    }
    for component in overrides {
        extract::fold_override(&mut entries, component, &info)?;
    }

    let (events, tasks) = count_kinds(&entries);
    if events == 0 && tasks == 0 {
        return Err(IcalError::EmptyCalendar);
    }

    for entry in &mut entries {
        zones.attach(entry);
        let schedule = entry.schedule_mut();
        if schedule.method.is_none() {
            schedule.method.clone_from(&info.method);
        }
    }

    let grouped = options.force_group || events > 1 || tasks > 1 || (events > 0 && tasks > 0);
    tracing::debug!(events, tasks, grouped, "Read calendar");
    if grouped {
        let mut group = extract::read_group(&calendar.root, &info)?;
        group.entries = entries;
        return Ok(JsEntity::Group(group));
    }
    match entries.pop() {
        Some(Entry::Event(event)) => Ok(JsEntity::Event(event)),
        Some(Entry::Task(task)) => Ok(JsEntity::Task(task)),
        None => Err(IcalError::EmptyCalendar),
    }
}

/// ## Summary
/// Writes a `Group`, `Event` or `Task` as an iCalendar object.
///
/// `PRODID` and `METHOD` come from the object (the first entry naming a
/// method, for groups) and fall back to `config`. Configured calendar
/// properties are copied as given, except `PRODID`, `VERSION` and
/// `METHOD`. Time zone definitions of all entries are
/// written once per id, and the calendar is sorted before it is returned.
///
/// ## Errors
/// Fails when a value cannot be expressed in iCalendar or a recurrence
/// override cannot be applied.
#[tracing::instrument(skip(entity, config), fields(uid = %entity.uid()))]
pub fn ical_build(entity: &JsEntity, config: &IcalConfig) -> IcalResult<ICalendar> {
    let (prod_id, method) = match entity {
        JsEntity::Group(group) => (
            group.common.prod_id.clone(),
            group
                .entries
                .iter()
                .find_map(|entry| entry.schedule().method.clone()),
        ),
        JsEntity::Event(event) => (event.common.prod_id.clone(), event.schedule.method.clone()),
        JsEntity::Task(task) => (task.common.prod_id.clone(), task.schedule.method.clone()),
    };
    let context = BuildContext {
        prod_id: prod_id.unwrap_or_else(|| config.prod_id.clone()),
        method: method.or_else(|| config.method.clone()),
        now: chrono::Utc::now(),
    };

    let mut calendar = ICalendar::new(context.prod_id.clone());
    for (name, value) in &config.properties {
        if is_reserved(name) {
            tracing::warn!(%name, "Ignoring configured calendar property with a setting of its own");
            continue;
        }
        calendar
            .root
            .set_property(jscal_rfc::ical::Property::text(name, value));
    }
    if let Some(method) = &context.method {
        calendar.set_method(method);
    }

    let mut zones = assemble::timezone::ZoneSet::default();
    match entity {
        JsEntity::Group(group) => {
            assemble::write_group(&mut calendar.root, group, &context)?;
            for entry in &group.entries {
                match entry {
                    Entry::Event(event) => write_item(&mut calendar, event, &context, &mut zones)?,
                    Entry::Task(task) => write_item(&mut calendar, task, &context, &mut zones)?,
                }
            }
        }
        JsEntity::Event(event) => write_item(&mut calendar, event, &context, &mut zones)?,
        JsEntity::Task(task) => write_item(&mut calendar, task, &context, &mut zones)?,
    }
    for zone in zones.into_components()? {
        calendar.add_timezone(zone);
    }

    calendar.sort_components();
    Ok(calendar)
}

fn write_item<T: Mapped>(
    calendar: &mut ICalendar,
    item: &T,
    context: &BuildContext,
    zones: &mut assemble::timezone::ZoneSet,
) -> IcalResult<()> {
    zones.extend(item.schedule().time_zones.values());
    for component in assemble::write_series(item, context)? {
        calendar.root.add_child(component);
    }
    Ok(())
}

/// ## Summary
/// Parses iCalendar text and reads it with [`ical_parse`].
///
/// ## Errors
/// Returns `Rfc` for malformed text, otherwise as [`ical_parse`].
pub fn from_ics(text: &str, options: &ParseOptions) -> IcalResult<JsEntity> {
    let calendar = parse(text)?;
    ical_parse(&calendar, options)
}

/// ## Summary
/// Builds with [`ical_build`] and serializes the result.
///
/// ## Errors
/// As [`ical_build`].
pub fn to_ics(entity: &JsEntity, config: &IcalConfig) -> IcalResult<String> {
    Ok(serialize(&ical_build(entity, config)?))
}
