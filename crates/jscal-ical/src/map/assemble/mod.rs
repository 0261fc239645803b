//! Writing model objects as iCalendar components.
//!
//! ## Summary
//! Each writer records which JSON properties it expressed. Whatever is left
//! when a component is finished travels as `X-JSCAL-PROPERTY` lines, so
//! nothing is lost on the way through iCalendar.

mod alarm;
mod participant;
mod place;
pub(crate) mod timezone;

use std::collections::{BTreeMap, BTreeSet};

use jscal_core::constants::ANONYMOUS_TZ_PREFIX;
use jscal_model::entity::{Common, Group, Relation, Scheduled};
use jscal_model::json::raw;
use jscal_model::{LocalDateTime, UtcDateTime};
use jscal_rfc::ical::core::{
    Component, DateOrDateTime, Parameter, Property, names, param_names,
};
use serde::Serialize;
use serde_json::Value;

use super::codes::{class_token, transp_token};
use super::rrule::to_rrule;
use super::values::{ical_instant, ical_time};
use super::{BuildContext, Mapped};
use crate::error::IcalResult;

/// Builds one component and tracks the JSON properties it covers.
pub(crate) struct Assembler<'a> {
    component: Component,
    written: BTreeSet<&'static str>,
    context: &'a BuildContext,
}

impl<'a> Assembler<'a> {
    pub fn new(component: Component, context: &'a BuildContext) -> Self {
        Self {
            component,
            written: BTreeSet::new(),
            context,
        }
    }

    pub const fn context(&self) -> &'a BuildContext {
        self.context
    }

    /// Adds `prop` as the complete iCalendar form of JSON property `key`.
    pub fn put(&mut self, key: &'static str, prop: Property) {
        self.component.add_property(prop);
        self.mark(key);
    }

    pub fn add(&mut self, prop: Property) {
        self.component.add_property(prop);
    }

    pub fn mark(&mut self, key: &'static str) {
        self.written.insert(key);
    }

    pub fn mark_if(&mut self, key: &'static str, covered: bool) {
        if covered {
            self.mark(key);
        }
    }

    pub fn child(&mut self, child: Component) {
        self.component.add_child(child);
    }

    /// UTC DATE-TIME; only whole seconds survive, so `key` is covered only
    /// when `instant` has no fraction.
    pub fn put_instant(&mut self, key: &'static str, name: &str, instant: &UtcDateTime) {
        self.add(Property::datetime(name, ical_instant(instant)));
        self.mark_if(key, instant.timestamp_subsec_nanos() == 0);
    }

    /// ## Summary
    /// Appends an `X-JSCAL-PROPERTY` line for every top-level property of
    /// `item` that no writer covered, and returns the component.
    ///
    /// ## Errors
    /// Fails when `item` cannot be serialized.
    pub fn finish<T: Serialize>(mut self, item: &T) -> IcalResult<Component> {
        let Value::Object(map) = raw::to_value(item)? else {
            return Ok(self.component);
        };
        for (key, value) in &map {
            if key == "@type" || self.written.contains(key.as_str()) {
                continue;
            }
            tracing::trace!(%key, component = %self.component.name, "Carrying property as extension");
            self.component.add_property(
                Property::text(names::X_JSCAL_PROPERTY, raw::encode(value, false)?)
                    .with_param(Parameter::jsid(key.as_str())),
            );
        }
        Ok(self.component)
    }
}

/// Whether the JSON form of `item` has no properties besides `@type` and
/// `allowed`.
pub(super) fn has_only<T: Serialize>(item: &T, allowed: &[&str]) -> bool {
    match raw::to_value(item) {
        Ok(Value::Object(map)) => map
            .keys()
            .all(|key| key == "@type" || allowed.contains(&key.as_str())),
        _ => false,
    }
}

/// Whether every value of a boolean set is `true`.
pub(super) fn all_set(set: &BTreeMap<String, bool>) -> bool {
    set.values().all(|on| *on)
}

/// `RELATED-TO` lines for `related_to`, and whether they express it fully.
pub(super) fn relation_lines(related_to: &BTreeMap<String, Relation>) -> (Vec<Property>, bool) {
    let mut covered = true;
    let mut lines = Vec::new();
    for (uid, relation) in related_to {
        covered &= !relation.relation.is_empty()
            && all_set(&relation.relation)
            && relation
                .relation
                .keys()
                .all(|kind| *kind == kind.to_ascii_lowercase())
            && has_only(relation, &["relation"]);
        for kind in relation.relation.iter().filter(|(_, on)| **on).map(|(kind, _)| kind) {
            lines.push(
                Property::text(names::RELATED_TO, uid.as_str())
                    .with_param(Parameter::new(param_names::RELTYPE, kind.to_ascii_uppercase())),
            );
        }
    }
    (lines, covered)
}

/// ## Summary
/// Writes the metadata shared by every calendar object.
pub(super) fn write_common(asm: &mut Assembler<'_>, common: &Common) {
    let context = asm.context();
    asm.put("uid", Property::text(names::UID, common.uid.as_str()));
    asm.mark_if("prodId", common.prod_id.as_deref() == Some(context.prod_id.as_str()));

    if let Some(created) = &common.created {
        asm.put_instant("created", names::CREATED, created);
    }
    match &common.updated {
        Some(updated) => asm.put_instant("updated", names::DTSTAMP, updated),
        None => asm.add(Property::datetime(names::DTSTAMP, ical_instant(&context.now))),
    }

    if let Some(title) = common.title() {
        asm.put(
            "title",
            Property::text(names::SUMMARY, title)
                .with_opt_param(param_names::LANGUAGE, common.locale()),
        );
        asm.mark("locale");
    }
    if let Some(description) = common.description() {
        if let Some(content_type) = &common.description_content_type {
            asm.add(
                Property::text(names::STYLED_DESCRIPTION, description)
                    .with_param(Parameter::new(param_names::FMTTYPE, content_type.as_str())),
            );
            asm.mark("descriptionContentType");
        }
        asm.put("description", Property::text(names::DESCRIPTION, description));
    }

    if !common.keywords.is_empty() {
        let keywords = common.keywords.keys().cloned().collect();
        asm.add(Property::text_list(names::CATEGORIES, keywords));
        asm.mark_if("keywords", all_set(&common.keywords));
    }
    for category in common.categories.keys() {
        asm.add(Property::uri(names::CONCEPT, category.as_str()));
    }
    asm.mark_if("categories", all_set(&common.categories));
    if let Some(color) = common.color() {
        asm.put("color", Property::text(names::COLOR, color));
    }

    let mut links_covered = true;
    for (id, link) in &common.links {
        links_covered &= has_only(
            link,
            &["href", "contentType", "rel", "title", "display", "size"],
        ) && link.rel.as_deref().is_none_or(|rel| rel == rel.to_ascii_lowercase())
            && link
                .display
                .as_deref()
                .is_none_or(|display| display == display.to_ascii_lowercase());
        asm.add(
            Property::uri(names::LINK, link.href.as_str())
                .with_param(Parameter::jsid(id.as_str()))
                .with_param(Parameter::value_type("URI"))
                .with_opt_param(param_names::REL, link.rel.as_deref())
                .with_opt_param(param_names::FMTTYPE, link.content_type.as_deref())
                .with_opt_param(param_names::LABEL, link.title.as_deref())
                .with_opt_param(param_names::DISPLAY, link.display.as_deref())
                .with_opt_param(param_names::SIZE, link.size.map(|size| size.to_string())),
        );
    }
    asm.mark_if("links", links_covered);
}

fn referenced_zones<T: Scheduled>(item: &T) -> BTreeSet<&str> {
    let schedule = item.schedule();
    schedule
        .time_zone
        .iter()
        .chain(&schedule.recurrence_id_time_zone)
        .chain(schedule.locations.values().filter_map(|l| l.time_zone.as_ref()))
        .map(String::as_str)
        .collect()
}

/// ## Summary
/// Writes the scheduling properties shared by events and tasks.
///
/// ## Errors
/// Fails when a recurrence rule cannot be written or a value cannot be
/// serialized.
pub(super) fn write_schedule<T: Mapped>(asm: &mut Assembler<'_>, item: &T) -> IcalResult<()> {
    let schedule = item.schedule();
    let anchor = item.anchor();
    let context = asm.context();

    asm.mark_if(
        "method",
        schedule.method.as_deref().is_some_and(|method| {
            method == method.to_ascii_lowercase() && Some(method) == context.method.as_deref()
        }),
    );
    if schedule.sequence != 0
        && let Ok(sequence) = i32::try_from(schedule.sequence)
    {
        asm.put("sequence", Property::integer(names::SEQUENCE, sequence));
    }
    if schedule.priority != 0 {
        asm.put("priority", Property::integer(names::PRIORITY, i32::from(schedule.priority)));
    }
    if let Some(privacy) = schedule.privacy {
        asm.put("privacy", Property::text(names::CLASS, class_token(privacy)));
    }
    if let Some(status) = schedule.free_busy_status {
        asm.put("freeBusyStatus", Property::text(names::TRANSP, transp_token(status)));
    }
    if schedule.excluded {
        asm.put("excluded", Property::text(names::X_JSCAL_EXCLUDED, "TRUE"));
    }

    // A DATE start carries neither time nor zone.
    asm.mark_if("showWithoutTime", anchor.as_ref().is_some_and(DateOrDateTime::is_date));
    asm.mark_if(
        "timeZone",
        anchor.as_ref().is_some_and(|value| !value.is_date()),
    );
    let referenced = referenced_zones(item);
    asm.mark_if(
        "timeZones",
        schedule.time_zones.iter().all(|(key, zone)| {
            *key == zone.tz_id
                && (referenced.contains(key.as_str()) || key.starts_with(ANONYMOUS_TZ_PREFIX))
        }),
    );

    if let Some(recurrence_id) = schedule.recurrence_id {
        let zone = schedule
            .recurrence_id_time_zone
            .as_deref()
            .or(schedule.time_zone.as_deref());
        let value = ical_time(recurrence_id, zone, schedule.show_without_time);
        asm.mark_if(
            "recurrenceIdTimeZone",
            !value.is_date() && schedule.recurrence_id_time_zone != schedule.time_zone,
        );
        asm.put("recurrenceId", Property::date_or_datetime(names::RECURRENCE_ID, value));
    }
    for rule in &schedule.recurrence_rules {
        asm.add(Property::recur(names::RRULE, to_rrule(rule, anchor.as_ref())?));
    }
    asm.mark("recurrenceRules");
    for rule in &schedule.excluded_recurrence_rules {
        asm.add(Property::recur(names::EXRULE, to_rrule(rule, anchor.as_ref())?));
    }
    asm.mark("excludedRecurrenceRules");

    let (lines, covered) = relation_lines(&schedule.related_to);
    for line in lines {
        asm.add(line);
    }
    asm.mark_if("relatedTo", covered);

    participant::write(asm, schedule);
    place::write(asm, schedule);

    let title = item.common().title();
    let mut alerts_covered = true;
    for (id, alert) in &schedule.alerts {
        let (component, covered) = alarm::write(id, alert, title)?;
        alerts_covered &= covered;
        asm.child(component);
    }
    asm.mark_if("alerts", alerts_covered);

    for (language, patch) in &schedule.localizations {
        asm.add(
            Property::text(
                names::X_JSCAL_LOCALIZATION,
                raw::encode(&raw::to_value(patch)?, false)?,
            )
            .with_param(Parameter::language(language.as_str())),
        );
    }
    asm.mark("localizations");
    Ok(())
}

fn write_component<'a, T: Mapped>(
    item: &T,
    context: &'a BuildContext,
) -> IcalResult<Assembler<'a>> {
    let mut asm = Assembler::new(T::new_component(), context);
    write_common(&mut asm, item.common());
    write_schedule(&mut asm, item)?;
    item.write_own(&mut asm)?;
    Ok(asm)
}

fn add_dates(asm: &mut Assembler<'_>, name: &str, values: Vec<DateOrDateTime>) {
    let (dates, date_times): (Vec<_>, Vec<_>) =
        values.into_iter().partition(DateOrDateTime::is_date);
    for list in [dates, date_times] {
        if let Some(prop) = Property::date_list(name, list) {
            asm.add(prop);
        }
    }
}

/// ## Summary
/// Writes an event or task and its recurrence overrides.
///
/// Empty overrides become RDATE values and pure exclusions EXDATE values
/// of the series component. Every other override is materialized into an
/// occurrence and written as its own component with a RECURRENCE-ID.
///
/// ## Errors
/// Fails when an override cannot be applied or a value cannot be written.
#[tracing::instrument(skip(item, context), fields(uid = %item.common().uid))]
pub(super) fn write_series<T: Mapped>(item: &T, context: &BuildContext) -> IcalResult<Vec<Component>> {
    let mut asm = write_component(item, context)?;
    let schedule = item.schedule();
    let time_zone = schedule.time_zone.as_deref();
    let date_only = schedule.show_without_time;

    let mut additions = Vec::new();
    let mut exclusions = Vec::new();
    let mut changed: Vec<LocalDateTime> = Vec::new();
    let mut covered = true;
    for (recurrence_id, patch) in &schedule.recurrence_overrides {
        let value = ical_time(*recurrence_id, time_zone, date_only);
        if patch.is_empty() {
            additions.push(value);
        } else if patch.excludes_occurrence() {
            covered &= patch.len() == 1;
            exclusions.push(value);
        } else {
            changed.push(*recurrence_id);
        }
    }
    add_dates(&mut asm, names::RDATE, additions);
    add_dates(&mut asm, names::EXDATE, exclusions);

    let mut overrides = Vec::with_capacity(changed.len());
    for recurrence_id in changed {
        let Some(mut occurrence) = item.occurrence(recurrence_id)? else {
            continue;
        };
        let occurrence_schedule = occurrence.schedule_mut();
        if occurrence_schedule.recurrence_id_time_zone.is_none()
            && occurrence_schedule.time_zone.as_deref() != time_zone
        {
            occurrence_schedule.recurrence_id_time_zone = time_zone.map(str::to_string);
        }
        overrides.push(write_component(&occurrence, context)?.finish(&occurrence)?);
    }
    tracing::debug!(overrides = overrides.len(), "Wrote series");

    asm.mark_if("recurrenceOverrides", covered);
    let mut components = vec![asm.finish(item)?];
    components.extend(overrides);
    Ok(components)
}

/// ## Summary
/// Writes the calendar-level properties of a group into `root`.
///
/// ## Errors
/// Fails when a leftover property cannot be serialized.
pub(super) fn write_group(
    root: &mut Component,
    group: &Group,
    context: &BuildContext,
) -> IcalResult<()> {
    let mut asm = Assembler::new(std::mem::replace(root, Component::calendar()), context);
    asm.put("uid", Property::text(names::UID, group.common.uid.as_str()));
    asm.mark_if(
        "prodId",
        group.common.prod_id.as_deref() == Some(context.prod_id.as_str()),
    );
    if let Some(title) = group.common.title() {
        asm.put("title", Property::text(names::NAME, title));
    }
    if let Some(source) = &group.source {
        asm.put("source", Property::uri(names::SOURCE, source.as_str()));
    }
    asm.mark("entries");
    *root = asm.finish(group)?;
    Ok(())
}
