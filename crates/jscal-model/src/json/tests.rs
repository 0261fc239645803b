use serde_json::{Value, json};

use super::*;

fn samples() -> Vec<Value> {
    vec![
        json!({
            "@type": "Group",
            "uid": "g1",
            "title": "Team calendar",
            "source": "https://example.com/team.json",
            "entries": [
                {"@type": "Event", "uid": "e1", "start": "2024-01-01T09:00:00"},
                {"@type": "Task", "uid": "t1", "due": "2024-01-05T17:00:00"}
            ]
        }),
        json!({
            "@type": "Event",
            "uid": "e1",
            "created": "2023-12-01T10:00:00Z",
            "updated": "2023-12-02T10:00:00.500Z",
            "title": "Release review",
            "description": "Go/no-go",
            "keywords": {"release": true},
            "categories": {"http://example.com/cat/work": true},
            "color": "orange",
            "locale": "en",
            "sequence": 2,
            "priority": 5,
            "privacy": "private",
            "freeBusyStatus": "busy",
            "status": "tentative",
            "start": "2024-01-01T09:00:00",
            "duration": "PT1H30M",
            "timeZone": "Europe/Berlin",
            "replyTo": {"imip": "mailto:owner@example.com"},
            "recurrenceRules": [{"@type": "RecurrenceRule", "frequency": "weekly", "count": 4}],
            "recurrenceOverrides": {
                "2024-01-08T09:00:00": {"title": "Release review (moved)", "start": "2024-01-08T11:00:00"},
                "2024-01-15T09:00:00": {"excluded": true}
            },
            "participants": {
                "owner": {
                    "@type": "Participant",
                    "name": "Olivia",
                    "sendTo": {"imip": "mailto:owner@example.com"},
                    "roles": {"owner": true, "attendee": true},
                    "participationStatus": "accepted"
                }
            },
            "locations": {"l1": {"@type": "Location", "name": "Room 4", "coordinates": "geo:52.5,13.4"}},
            "virtualLocations": {"v1": {"@type": "VirtualLocation", "uri": "https://meet.example.com/r", "features": {"video": true}}},
            "alerts": {"a1": {"@type": "Alert", "trigger": {"@type": "OffsetTrigger", "offset": "-PT15M"}}},
            "localizations": {"de": {"title": "Release-Besprechung"}},
            "links": {"l1": {"@type": "Link", "href": "https://example.com/agenda.pdf", "size": 1024}}
        }),
        json!({
            "@type": "Task",
            "uid": "t1",
            "title": "File report",
            "due": "2024-01-05T17:00:00",
            "estimatedDuration": "PT4H",
            "progress": "in-process",
            "progressUpdated": "2024-01-03T08:00:00Z",
            "percentComplete": 30
        }),
        json!({
            "@type": "Alert",
            "trigger": {"@type": "AbsoluteTrigger", "when": "2024-01-01T08:00:00Z"},
            "acknowledged": "2024-01-01T08:01:00Z",
            "action": "email",
            "relatedTo": {"a0": {"@type": "Relation", "relation": {"parent": true}}}
        }),
        json!({"@type": "AbsoluteTrigger", "when": "2024-01-01T08:00:00Z"}),
        json!({"@type": "OffsetTrigger", "offset": "PT0H0M0S", "relativeTo": "end"}),
        json!({"@type": "UnknownTrigger", "vendor": {"radius": 10}}),
        json!({"@type": "Link", "href": "cid:logo", "cid": "logo", "contentType": "image/png", "rel": "icon", "display": "badge", "title": "Logo"}),
        json!({"@type": "Location", "name": "HQ", "description": "Main office", "locationTypes": {"office": true}, "relativeTo": "start", "timeZone": "America/New_York"}),
        json!({"@type": "NDay", "day": "fr", "nthOfPeriod": -1}),
        json!({"@type": "Participant", "name": "Jane", "email": "jane@example.com", "kind": "individual", "invitedBy": "owner", "expectReply": true, "scheduleSequence": 1}),
        json!({"@type": "PatchObject", "title": "Moved", "locations/l1/name": "Room 5"}),
        json!({"@type": "RecurrenceRule", "frequency": "monthly", "byDay": [{"@type": "NDay", "day": "mo", "nthOfPeriod": 1}], "until": "2024-12-31T00:00:00"}),
        json!({"@type": "Relation", "relation": {"next": true}}),
        json!({
            "@type": "TimeZone",
            "tzId": "Custom/Zone",
            "aliases": {"Custom/Alias": true},
            "standard": [{"@type": "TimeZoneRule", "start": "1970-10-25T03:00:00", "offsetFrom": "+02:00", "offsetTo": "+01:00", "names": {"CET": true}}],
            "daylight": [{"@type": "TimeZoneRule", "start": "1970-03-29T02:00:00", "offsetFrom": "+01:00", "offsetTo": "+02:00"}]
        }),
        json!({"@type": "TimeZoneRule", "start": "1970-01-01T00:00:00", "offsetFrom": "-05:00", "offsetTo": "-05:00", "comments": ["fixed"]}),
        json!({"@type": "VirtualLocation", "name": "Bridge", "uri": "tel:+1-555-0100", "features": {"phone": true}}),
    ]
}

#[test]
fn every_type_round_trips() {
    let samples = samples();
    assert_eq!(samples.len(), ObjectType::ALL.len());
    for sample in samples {
        let text = sample.to_string();
        let object = parse(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(object.object_type().as_str(), sample["@type"]);
        let written: Value = serde_json::from_str(&write(&object, false).unwrap()).unwrap();
        assert_eq!(written, sample, "round trip of {}", sample["@type"]);
    }
}

#[test]
fn unknown_type_is_named() {
    let err = parse(r#"{"@type": "Calendar"}"#).unwrap_err();
    assert!(matches!(&err, ModelError::UnknownObjectType(name) if name == "Calendar"));
}

#[test]
fn missing_type_is_invalid() {
    assert!(matches!(
        parse(r#"{"uid": "x"}"#),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(matches!(parse("[]"), Err(ModelError::InvalidArgument(_))));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse("{").unwrap_err();
    assert_eq!(err.code(), raw::PARSE_ERROR_CODE);
}

#[test]
fn write_as_checks_the_declared_type() {
    let object = JsObject::Event(Event::new("e1"));
    assert!(write_as(ObjectType::Event, &object, false).is_ok());
    let err = write_as(ObjectType::Task, &object, false).unwrap_err();
    assert!(matches!(err, ModelError::InvalidArgument(_)));
}

#[test]
fn absent_fields_are_omitted() {
    let text = write(&JsObject::Task(Task::new("t")), false).unwrap();
    assert_eq!(text, r#"{"@type":"Task","uid":"t"}"#);
    assert!(!text.contains("null"));
}

#[test]
fn parse_entity_rejects_sub_objects() {
    assert!(parse_entity(r#"{"@type": "Event", "uid": "e"}"#).is_ok());
    assert!(parse_entity(r#"{"@type": "Link", "href": "x"}"#).is_err());
}

#[test]
fn object_type_names_parse_back() {
    for object_type in ObjectType::ALL {
        assert_eq!(object_type.as_str().parse::<ObjectType>().unwrap(), object_type);
    }
}
