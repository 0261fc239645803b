//! Parse/serialize round trips over complete documents.

use super::fixtures::{RECURRING_WITH_EXCEPTIONS, TODO_WITH_ATTENDEES};
use crate::ical::build::serialize;
use crate::ical::core::{ComponentKind, Period, Value};
use crate::ical::parse::parse;

/// Serialization of a parsed document is a fixed point.
fn assert_stable(input: &str) {
    let first = parse(input).unwrap();
    let once = serialize(&first);
    let second = parse(&once).unwrap();
    assert_eq!(serialize(&second), once);
    assert_eq!(first.root.children.len(), second.root.children.len());
}

#[test_log::test]
fn recurring_event_with_exceptions_is_stable() {
    assert_stable(RECURRING_WITH_EXCEPTIONS);
}

#[test_log::test]
fn todo_with_attendees_is_stable() {
    assert_stable(TODO_WITH_ATTENDEES);
}

#[test_log::test]
fn recurring_event_structure() {
    let ical = parse(RECURRING_WITH_EXCEPTIONS).unwrap();
    assert_eq!(ical.method(), Some("PUBLISH"));
    assert_eq!(ical.events().len(), 2);
    assert_eq!(ical.uids(), vec!["weekly@example.com"]);

    let tz = ical.timezone("America/New_York").unwrap();
    assert_eq!(tz.children.len(), 2);
    assert!(tz.children[0].is(ComponentKind::Daylight));

    let master = ical.events()[0];
    let exdate = master.get_property("EXDATE").unwrap();
    let excluded = exdate.date_values();
    assert_eq!(excluded.len(), 2);
    assert!(excluded.iter().all(|d| d.tzid() == Some("America/New_York")));

    let override_event = ical.events()[1];
    assert!(override_event.get_property("RECURRENCE-ID").is_some());
}

#[test_log::test]
fn todo_structure() {
    let ical = parse(TODO_WITH_ATTENDEES).unwrap();
    let todo = ical.todos()[0];
    assert!(todo.get_property("DUE").and_then(|p| p.as_date()).is_some());
    assert_eq!(
        todo.get_property("CATEGORIES").unwrap().text_values(),
        vec!["FINANCE", "PERSONAL"]
    );
    let attendee = todo.get_property("ATTENDEE").unwrap();
    assert!(matches!(attendee.value, Value::CalAddress(ref a) if a == "mailto:john@example.com"));
    assert_eq!(attendee.get_param_value("CN"), Some("Doe, John"));
    assert_eq!(todo.get_property("PERCENT-COMPLETE").unwrap().as_integer(), Some(40));
}

#[test_log::test]
fn sorted_output_puts_timezones_first() {
    let mut ical = parse(TODO_WITH_ATTENDEES).unwrap();
    let events = parse(RECURRING_WITH_EXCEPTIONS).unwrap();
    ical.root.children.extend(events.root.children);
    ical.sort_components();

    let kinds: Vec<_> = ical.root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(kinds, vec!["VTIMEZONE", "VEVENT", "VEVENT", "VTODO"]);

    let output = serialize(&ical);
    assert!(output.find("BEGIN:VTIMEZONE").unwrap() < output.find("BEGIN:VEVENT").unwrap());
}

#[test_log::test]
fn period_values_survive() {
    let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//T//EN\r\nBEGIN:VEVENT\r\nUID:p\r\n\
                 RDATE;VALUE=PERIOD:20260201T090000Z/20260201T100000Z,20260202T090000Z/PT1H\r\n\
                 END:VEVENT\r\nEND:VCALENDAR\r\n";
    assert_stable(input);

    let ical = parse(input).unwrap();
    let rdate = ical.events()[0].get_property("RDATE").unwrap();
    let Value::PeriodList(periods) = &rdate.value else {
        panic!("expected a period list, got {:?}", rdate.value);
    };
    assert!(matches!(periods[0], Period::Explicit { .. }));
    assert!(matches!(periods[1], Period::Duration { .. }));
    assert_eq!(periods[1].to_string(), "20260202T090000Z/PT1H");
}
