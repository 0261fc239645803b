use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::marker::{EventType, GroupType, TaskType};
use super::{Common, Event, Schedule, Scheduled, Task};

/// A member of a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Event(Event),
    Task(Task),
}

impl Entry {
    #[must_use]
    pub fn common(&self) -> &Common {
        match self {
            Self::Event(event) => &event.common,
            Self::Task(task) => &task.common,
        }
    }

    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        match self {
            Self::Event(event) => event.schedule(),
            Self::Task(task) => task.schedule(),
        }
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        match self {
            Self::Event(event) => event.schedule_mut(),
            Self::Task(task) => task.schedule_mut(),
        }
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.common().uid
    }
}

impl From<Event> for Entry {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

impl From<Task> for Entry {
    fn from(task: Task) -> Self {
        Self::Task(task)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        match value.get("@type").and_then(Value::as_str) {
            Some(EventType::NAME) => serde_json::from_value(value)
                .map(Self::Event)
                .map_err(D::Error::custom),
            Some(TaskType::NAME) => serde_json::from_value(value)
                .map(Self::Task)
                .map_err(D::Error::custom),
            Some(other) => Err(D::Error::custom(format!(
                "group entry must be an Event or a Task, found {other:?}"
            ))),
            None => Err(D::Error::missing_field("@type")),
        }
    }
}

/// A collection of events and tasks, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "@type", default)]
    object_type: GroupType,
    #[serde(flatten)]
    pub common: Common,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Group {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            common: Common::with_uid(uid),
            ..Self::default()
        }
    }

    pub fn add_entry(&mut self, entry: impl Into<Entry>) {
        self.entries.push(entry.into());
    }

    /// The entry with the given uid, if any.
    #[must_use]
    pub fn entry(&self, uid: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.uid() == uid)
    }
}

/// A top-level calendar object: what the format adapters read and write.
#[derive(Debug, Clone, PartialEq)]
pub enum JsEntity {
    Group(Group),
    Event(Event),
    Task(Task),
}

impl JsEntity {
    #[must_use]
    pub fn uid(&self) -> &str {
        match self {
            Self::Group(group) => &group.common.uid,
            Self::Event(event) => &event.common.uid,
            Self::Task(task) => &task.common.uid,
        }
    }

    /// The events and tasks this object holds: the entries of a group,
    /// otherwise the object itself.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::Group(group) => group.entries,
            Self::Event(event) => vec![Entry::Event(event)],
            Self::Task(task) => vec![Entry::Task(task)],
        }
    }
}

impl From<Entry> for JsEntity {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Event(event) => Self::Event(event),
            Entry::Task(task) => Self::Task(task),
        }
    }
}

impl From<Group> for JsEntity {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entries_dispatch_on_type_and_keep_order() {
        let group: Group = serde_json::from_value(json!({
            "@type": "Group",
            "uid": "g",
            "entries": [
                {"@type": "Task", "uid": "b"},
                {"@type": "Event", "uid": "a"}
            ]
        }))
        .unwrap();
        assert!(matches!(group.entries[0], Entry::Task(_)));
        assert!(matches!(group.entries[1], Entry::Event(_)));
        assert_eq!(group.entry("a").map(Entry::uid), Some("a"));
    }

    #[test]
    fn entries_need_a_known_type() {
        let missing = json!({"uid": "g", "entries": [{"uid": "a"}]});
        assert!(serde_json::from_value::<Group>(missing).is_err());
        let nested = json!({"uid": "g", "entries": [{"@type": "Group", "uid": "a"}]});
        assert!(serde_json::from_value::<Group>(nested).is_err());
    }
}
