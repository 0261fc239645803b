//! `TimeZone` objects to VTIMEZONE components.

use std::collections::BTreeMap;

use jscal_core::constants::ANONYMOUS_TZ_PREFIX;
use jscal_model::entity::{TimeZone, TimeZoneRule};
use jscal_rfc::ical::core::{Component, ComponentKind, DateOrDateTime, DateTime, Property, names};

use crate::error::{IcalError, IcalResult};
use crate::map::rrule::to_rrule;
use crate::map::values::{ical_instant, parse_offset};

/// Time zone definitions collected from every written object, one per id.
#[derive(Debug, Default)]
pub(crate) struct ZoneSet {
    zones: BTreeMap<String, TimeZone>,
}

impl ZoneSet {
    pub fn extend<'z>(&mut self, zones: impl IntoIterator<Item = &'z TimeZone>) {
        for zone in zones {
            self.zones
                .entry(zone.tz_id.clone())
                .or_insert_with(|| zone.clone());
        }
    }

    /// ## Summary
    /// One VTIMEZONE per collected definition, in id order.
    ///
    /// ## Errors
    /// Fails when an observance offset is not `+hh:mm[:ss]` or a rule cannot
    /// be written.
    pub fn into_components(self) -> IcalResult<Vec<Component>> {
        self.zones.values().map(write_zone).collect()
    }
}

fn offset_line(name: &str, offset: &str) -> IcalResult<Property> {
    parse_offset(offset)
        .map(|value| Property::utc_offset(name, value))
        .ok_or_else(|| IcalError::InvalidComponent(format!("Invalid UTC offset {offset}")))
}

fn write_rule(kind: ComponentKind, rule: &TimeZoneRule) -> IcalResult<Component> {
    let mut observance = Component::new(kind);
    let start = DateTime::floating(rule.start.naive());
    observance.add_property(Property::datetime(names::DTSTART, start.clone()));
    observance.add_property(offset_line(names::TZOFFSETFROM, &rule.offset_from)?);
    observance.add_property(offset_line(names::TZOFFSETTO, &rule.offset_to)?);

    // Observance rules must end in UTC.
    let anchor = DateOrDateTime::DateTime(DateTime::utc(start.local));
    for recurrence in &rule.recurrence_rules {
        observance.add_property(Property::recur(names::RRULE, to_rrule(recurrence, Some(&anchor))?));
    }
    let dates = rule
        .recurrence_overrides
        .keys()
        .map(|date| DateOrDateTime::DateTime(DateTime::floating(date.naive())))
        .collect();
    if let Some(prop) = Property::date_list(names::RDATE, dates) {
        observance.add_property(prop);
    }
    for name in rule.names.iter().filter(|(_, on)| **on).map(|(name, _)| name) {
        observance.add_property(Property::text(names::TZNAME, name.as_str()));
    }
    for comment in &rule.comments {
        observance.add_property(Property::text(names::COMMENT, comment.as_str()));
    }
    Ok(observance)
}

fn write_zone(zone: &TimeZone) -> IcalResult<Component> {
    let mut component = Component::new(ComponentKind::Timezone);
    if !zone.tz_id.starts_with(ANONYMOUS_TZ_PREFIX) {
        component.add_property(Property::text(names::TZID, zone.tz_id.as_str()));
    }
    if let Some(updated) = &zone.updated {
        component.add_property(Property::datetime(names::LAST_MODIFIED, ical_instant(updated)));
    }
    if let Some(url) = &zone.url {
        component.add_property(Property::uri(names::TZURL, url.as_str()));
    }
    if let Some(until) = &zone.valid_until {
        component.add_property(Property::datetime(names::TZUNTIL, ical_instant(until)));
    }
    for alias in zone.aliases.iter().filter(|(_, on)| **on).map(|(alias, _)| alias) {
        component.add_property(Property::text(names::TZID_ALIAS_OF, alias.as_str()));
    }
    for rule in &zone.standard {
        component.add_child(write_rule(ComponentKind::Standard, rule)?);
    }
    for rule in &zone.daylight {
        component.add_child(write_rule(ComponentKind::Daylight, rule)?);
    }
    tracing::trace!(tz_id = %zone.tz_id, "Wrote VTIMEZONE");
    Ok(component)
}
