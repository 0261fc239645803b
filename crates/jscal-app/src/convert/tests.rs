use std::path::Path;

use super::*;

const EVENT_JSON: &str = r#"{
    "@type": "Event",
    "uid": "standup",
    "prodId": "-//Test//EN",
    "updated": "2026-01-02T10:00:00Z",
    "title": "Standup",
    "start": "2026-03-02T09:00:00",
    "timeZone": "Europe/Berlin",
    "duration": "PT15M",
    "recurrenceRules": [{ "@type": "RecurrenceRule", "frequency": "daily", "count": 5 }],
    "recurrenceOverrides": { "2026-03-04T09:00:00": { "excluded": true } }
}"#;

#[test]
fn formats_from_extensions() {
    assert_eq!(Format::of_path(Path::new("a.ics")), Some(Format::Ics));
    assert_eq!(Format::of_path(Path::new("a.JSON")), Some(Format::Json));
    assert_eq!(Format::of_path(Path::new("a.txt")), None);
    assert_eq!(Format::of_path(Path::new("-")), None);
    assert_eq!(Format::Json.other(), Format::Ics);
}

#[test_log::test]
fn json_to_ics_and_back() {
    let options = Options::default();
    let ics = convert(EVENT_JSON, Format::Json, Format::Ics, &options).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.contains("RRULE:FREQ=DAILY"));
    assert!(ics.contains("COUNT=5"));
    assert!(ics.contains("EXDATE;TZID=Europe/Berlin:20260304T090000"));

    let back = read(&ics, Format::Ics, &options).unwrap();
    assert_eq!(back, read(EVENT_JSON, Format::Json, &options).unwrap());
}

#[test_log::test]
fn group_option_wraps_single_objects() {
    let options = Options {
        parse: ParseOptions { force_group: true },
        ..Options::default()
    };
    let JsEntity::Group(group) = read(EVENT_JSON, Format::Json, &options).unwrap() else {
        panic!("expected a group");
    };
    assert_eq!(group.entries.len(), 1);
    assert_eq!(group.common.prod_id.as_deref(), Some("-//Test//EN"));
    assert!(group.entry("standup").is_some());
}

#[test_log::test]
fn pretty_json_output() {
    let options = Options {
        pretty: true,
        ..Options::default()
    };
    let text = convert(EVENT_JSON, Format::Json, Format::Json, &options).unwrap();
    assert!(text.starts_with("{\n"));
    assert!(text.contains("\"@type\": \"Event\""));
}

#[test]
fn invalid_input_is_reported() {
    let err = read("{ \"@type\": \"Event\"", Format::Json, &Options::default()).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
    let err = read("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n", Format::Ics, &Options::default())
        .unwrap_err();
    assert!(err.to_string().contains("Invalid iCalendar"));
}

#[test]
fn summary_counts_overrides() {
    let entity = read(EVENT_JSON, Format::Json, &Options::default()).unwrap();
    let summary = Summary::of(&entity);
    assert_eq!(summary.kind, "Event");
    assert_eq!(summary.overrides, 1);
    assert_eq!(
        summary.to_string(),
        "Event standup: 1 entry, 1 recurrence override"
    );
}
