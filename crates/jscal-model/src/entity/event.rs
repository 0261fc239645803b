use serde::{Deserialize, Serialize};

use super::marker::EventType;
use super::{Common, Schedule, Scheduled};
use crate::temporal::{Duration, LocalDateTime};

/// A scheduled amount of time on a calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "@type", default)]
    object_type: EventType,
    #[serde(flatten)]
    pub common: Common,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<LocalDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl Event {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            common: Common::with_uid(uid),
            ..Self::default()
        }
    }

    /// The duration, zero when unset.
    #[must_use]
    pub fn duration_or_zero(&self) -> Duration {
        self.duration.unwrap_or_default()
    }

    /// The wall-clock end: `start` plus `duration`.
    #[must_use]
    pub fn end(&self) -> Option<LocalDateTime> {
        let start = self.start?;
        self.duration_or_zero()
            .add_to(start.naive())
            .map(LocalDateTime::new)
    }
}

impl Scheduled for Event {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    fn start(&self) -> Option<LocalDateTime> {
        self.start
    }

    fn set_start(&mut self, start: Option<LocalDateTime>) {
        self.start = start;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::patch::PatchObject;
    use crate::recurrence::{Frequency, RecurrenceRule};

    fn local(text: &str) -> LocalDateTime {
        text.parse().unwrap()
    }

    fn weekly_standup() -> Event {
        let mut event = Event::new("standup");
        event.common.set_title(Some("Standup"));
        event.start = Some(local("2024-01-01T09:00:00"));
        event.duration = Some(Duration::hms(0, 15, 0));
        event.schedule.time_zone = Some("Europe/Berlin".into());
        event
            .schedule
            .recurrence_rules
            .push(RecurrenceRule::new(Frequency::Weekly));
        event
    }

    #[test]
    fn wire_form_flattens_shared_properties() {
        let json = serde_json::to_value(weekly_standup()).unwrap();
        assert_eq!(json["@type"], "Event");
        assert_eq!(json["uid"], "standup");
        assert_eq!(json["title"], "Standup");
        assert_eq!(json["timeZone"], "Europe/Berlin");
        assert_eq!(json["duration"], "PT15M");
        assert_eq!(json["recurrenceRules"][0]["frequency"], "weekly");
        assert!(json.get("participants").is_none());
    }

    #[test]
    fn end_adds_duration() {
        assert_eq!(
            weekly_standup().end(),
            Some(local("2024-01-01T09:15:00"))
        );
    }

    #[test]
    fn occurrence_without_override() {
        let event = weekly_standup();
        let occurrence = event
            .occurrence(local("2024-01-08T09:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(occurrence.start, Some(local("2024-01-08T09:00:00")));
        assert_eq!(
            occurrence.schedule.recurrence_id,
            Some(local("2024-01-08T09:00:00"))
        );
        assert!(occurrence.schedule.recurrence_rules.is_empty());
        assert_eq!(occurrence.common.title(), Some("Standup"));
    }

    #[test]
    fn occurrence_applies_override() {
        let mut event = weekly_standup();
        let rid = local("2024-01-08T09:00:00");
        let patch: PatchObject = serde_json::from_value(json!({
            "title": "Planning",
            "start": "2024-01-08T10:00:00",
            "uid": "ignored"
        }))
        .unwrap();
        event.schedule.add_recurrence_override(rid, patch);

        let occurrence = event.occurrence(rid).unwrap().unwrap();
        assert_eq!(occurrence.common.title(), Some("Planning"));
        assert_eq!(occurrence.start, Some(local("2024-01-08T10:00:00")));
        assert_eq!(occurrence.common.uid, "standup");
    }

    #[test]
    fn excluded_occurrence_is_none() {
        let mut event = weekly_standup();
        let rid = local("2024-01-15T09:00:00");
        let mut patch = PatchObject::new();
        patch.insert("excluded", json!(true));
        event.schedule.add_recurrence_override(rid, patch);
        assert!(event.occurrence(rid).unwrap().is_none());
    }

    #[test]
    fn localized_applies_patch_and_locale() {
        let mut event = weekly_standup();
        let mut patch = PatchObject::new();
        patch.insert("title", json!("Tägliches Treffen"));
        event.schedule.add_localization("de", patch);

        let german = event.localized("de").unwrap();
        assert_eq!(german.common.title(), Some("Tägliches Treffen"));
        assert_eq!(german.common.locale(), Some("de"));
        assert_eq!(event.localized("fr").unwrap(), event);
    }
}
