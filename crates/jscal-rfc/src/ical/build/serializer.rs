//! iCalendar serializer (RFC 5545).
//!
//! Children are written in stored order; call
//! [`ICalendar::sort_components`] first for canonical output. Properties
//! and parameters are written in a fixed canonical order.

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::ical::core::{Component, ComponentKind, ICalendar, Parameter, Property, Value};

/// Serializes an iCalendar document.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    let mut out = String::new();
    write_component(&mut out, &ical.root);
    tracing::trace!(len = out.len(), "Serialized iCalendar document");
    out
}

/// Serializes a single component and its children.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = String::new();
    write_component(&mut out, component);
    out
}

fn write_component(out: &mut String, component: &Component) {
    out.push_str(&fold_line(&format!("BEGIN:{}", component.name)));
    for prop in ordered_by(&component.properties, property_order(component.kind), |p| &p.name) {
        out.push_str(&serialize_property(prop));
    }
    for child in &component.children {
        write_component(out, child);
    }
    out.push_str(&fold_line(&format!("END:{}", component.name)));
}

/// Serializes one property as a folded content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();
    for param in ordered_by(&prop.params, PARAM_ORDER, |p| &p.name) {
        line.push(';');
        line.push_str(&serialize_parameter(param));
    }
    line.push(':');
    match &prop.value {
        Value::Text(s) => line.push_str(&escape_text(s)),
        Value::TextList(list) => {
            let escaped: Vec<String> = list.iter().map(|s| escape_text(s)).collect();
            line.push_str(&escaped.join(","));
        }
        _ => line.push_str(&prop.raw_value),
    }
    fold_line(&line)
}

#[must_use]
pub fn serialize_parameter(param: &Parameter) -> String {
    let values: Vec<String> = param.values.iter().map(|v| escape_param_value(v)).collect();
    format!("{}={}", param.name, values.join(","))
}

/// Items named in `order` first (in that order), then the rest as stored.
fn ordered_by<'a, T>(items: &'a [T], order: &[&str], name: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let rank = |item: &T| {
        order
            .iter()
            .position(|n| name(item).eq_ignore_ascii_case(n))
            .unwrap_or(order.len())
    };
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| rank(item));
    sorted
}

const PARAM_ORDER: &[&str] = &[
    "VALUE", "TZID", "X-JSID", "RELATED", "RANGE", "LANGUAGE", "FMTTYPE", "ALTREP", "CN",
    "EMAIL", "CUTYPE", "ROLE", "PARTSTAT", "RSVP", "DELEGATED-FROM", "DELEGATED-TO", "SENT-BY",
    "MEMBER", "RELTYPE", "REL", "LABEL", "FEATURE",
];

fn property_order(kind: Option<ComponentKind>) -> &'static [&'static str] {
    match kind {
        Some(ComponentKind::Calendar) => &["VERSION", "PRODID", "CALSCALE", "METHOD"],
        Some(ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal) => &[
            "UID",
            "DTSTAMP",
            "RECURRENCE-ID",
            "DTSTART",
            "DTEND",
            "DUE",
            "DURATION",
            "RRULE",
            "EXRULE",
            "RDATE",
            "EXDATE",
            "SUMMARY",
            "DESCRIPTION",
            "STYLED-DESCRIPTION",
            "LOCATION",
            "GEO",
            "CLASS",
            "STATUS",
            "PRIORITY",
            "TRANSP",
            "PERCENT-COMPLETE",
            "COMPLETED",
            "ORGANIZER",
            "ATTENDEE",
            "CATEGORIES",
            "CONCEPT",
            "RELATED-TO",
            "LINK",
            "CREATED",
            "LAST-MODIFIED",
            "SEQUENCE",
            "COLOR",
            "CONFERENCE",
        ],
        Some(ComponentKind::Timezone) => &["TZID", "LAST-MODIFIED", "TZURL", "TZUNTIL"],
        Some(ComponentKind::Standard | ComponentKind::Daylight) => &[
            "DTSTART",
            "TZOFFSETFROM",
            "TZOFFSETTO",
            "RRULE",
            "RDATE",
            "TZNAME",
            "COMMENT",
        ],
        Some(ComponentKind::Alarm) => &["UID", "ACTION", "TRIGGER", "DESCRIPTION", "ACKNOWLEDGED"],
        _ => &[],
    }
}
