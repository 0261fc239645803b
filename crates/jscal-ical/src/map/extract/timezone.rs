//! VTIMEZONE components to `TimeZone` objects.

use std::collections::BTreeMap;

use jscal_core::constants::ANONYMOUS_TZ_PREFIX;
use jscal_model::entity::{Entry, TimeZone, TimeZoneRule};
use jscal_rfc::ical::core::{Component, ComponentKind, ICalendar, Property, names};

use super::instant_of;
use crate::error::{IcalError, IcalResult};
use crate::map::rrule::from_rrule;
use crate::map::values::{Anchored, format_offset};

/// Time zone definitions of one calendar.
#[derive(Debug, Default)]
pub(in crate::map) struct Zones {
    named: BTreeMap<String, TimeZone>,
    /// Definitions without TZID, keyed `/anonymous-<n>`.
    anonymous: Vec<TimeZone>,
}

impl Zones {
    /// ## Summary
    /// Copies the definitions `entry` refers to into its `timeZones`.
    ///
    /// An entry refers to its own zone, its recurrence id zone and the zones
    /// of its locations. Anonymous definitions cannot be referred to and are
    /// copied into every entry.
    pub fn attach(&self, entry: &mut Entry) {
        let schedule = entry.schedule();
        let mut wanted: Vec<String> = schedule
            .time_zone
            .iter()
            .chain(&schedule.recurrence_id_time_zone)
            .cloned()
            .collect();
        wanted.extend(
            schedule
                .locations
                .values()
                .filter_map(|location| location.time_zone.clone()),
        );

        let schedule = entry.schedule_mut();
        for tz_id in wanted {
            if let Some(zone) = self.named.get(&tz_id) {
                schedule.add_time_zone(zone.clone());
            }
        }
        for zone in &self.anonymous {
            schedule.add_time_zone(zone.clone());
        }
    }
}

fn offset(component: &Component, name: &str) -> IcalResult<String> {
    component
        .get_property(name)
        .and_then(|prop| prop.value.as_utc_offset())
        .map(format_offset)
        .ok_or_else(|| IcalError::InvalidComponent(format!("{} without {name}", component.name)))
}

fn read_rule(observance: &Component) -> IcalResult<TimeZoneRule> {
    let start = observance
        .get_property(names::DTSTART)
        .and_then(Property::as_date_or_datetime)
        .ok_or_else(|| {
            IcalError::InvalidComponent(format!("{} without DTSTART", observance.name))
        })?;
    let mut rule = TimeZoneRule::new(
        Anchored::from(&start).local,
        offset(observance, names::TZOFFSETFROM)?,
        offset(observance, names::TZOFFSETTO)?,
    );

    for prop in observance.get_properties(names::RRULE) {
        if let Some(rrule) = prop.as_recur() {
            rule.recurrence_rules.push(from_rrule(rrule, None)?);
        }
    }
    for prop in observance.get_properties(names::RDATE) {
        for date in prop.date_values() {
            rule.recurrence_overrides
                .entry(Anchored::from(&date).local)
                .or_default();
        }
    }
    for prop in observance.get_properties(names::TZNAME) {
        if let Some(name) = prop.as_text() {
            rule.names.insert(name.to_string(), true);
        }
    }
    for prop in observance.get_properties(names::COMMENT) {
        if let Some(comment) = prop.as_text() {
            rule.comments.push(comment.to_string());
        }
    }
    Ok(rule)
}

fn read_zone(component: &Component, tz_id: String) -> IcalResult<TimeZone> {
    let mut zone = TimeZone::new(tz_id);
    zone.updated = instant_of(component, names::LAST_MODIFIED);
    zone.url = component
        .get_property(names::TZURL)
        .and_then(Property::as_uri)
        .map(str::to_string);
    zone.valid_until = instant_of(component, names::TZUNTIL);
    for prop in component.get_properties(names::TZID_ALIAS_OF) {
        for alias in prop.text_values() {
            zone.aliases.insert(alias.to_string(), true);
        }
    }
    for observance in &component.children {
        match observance.kind {
            Some(ComponentKind::Standard) => zone.standard.push(read_rule(observance)?),
            Some(ComponentKind::Daylight) => zone.daylight.push(read_rule(observance)?),
            _ => tracing::debug!(component = %observance.name, "Ignoring VTIMEZONE child"),
        }
    }
    Ok(zone)
}

/// ## Summary
/// Reads every VTIMEZONE of `calendar`.
///
/// ## Errors
/// Fails when an observance lacks its start or offsets, or carries an
/// invalid RRULE.
pub(in crate::map) fn harvest(calendar: &ICalendar) -> IcalResult<Zones> {
    let mut zones = Zones::default();
    for component in calendar.timezones() {
        if let Some(tz_id) = component.text_of(names::TZID) {
            let zone = read_zone(component, tz_id.to_string())?;
            zones.named.insert(zone.tz_id.clone(), zone);
        } else {
            let tz_id = format!("{ANONYMOUS_TZ_PREFIX}{}", zones.anonymous.len() + 1);
            tracing::debug!(%tz_id, "VTIMEZONE without TZID");
            zones.anonymous.push(read_zone(component, tz_id)?);
        }
    }
    tracing::trace!(
        named = zones.named.len(),
        anonymous = zones.anonymous.len(),
        "Harvested time zones"
    );
    Ok(zones)
}
