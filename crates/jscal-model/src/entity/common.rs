//! Property sets shared by several object kinds.
//!
//! [`Common`] holds the metadata of groups, events and tasks. [`Schedule`]
//! holds what events and tasks share on top of it. Both are flattened into
//! the owning object on the wire.

use std::collections::BTreeMap;

use jscal_core::util::id::{generate_id, is_valid_id};
use serde::{Deserialize, Serialize};

use super::serde_util::{is_zero, is_zero_u8, non_empty, optional_text};
use super::{Alert, Link, Location, Participant, Relation, TimeZone, VirtualLocation};
use crate::error::{ModelError, ModelResult};
use crate::patch::PatchObject;
use crate::recurrence::RecurrenceRule;
use crate::temporal::{LocalDateTime, UtcDateTime};

/// Returns `id` if usable as a map key, `InvalidArgument` otherwise.
pub(crate) fn checked_id(id: &str) -> ModelResult<String> {
    if is_valid_id(id) {
        Ok(id.to_string())
    } else {
        Err(ModelError::InvalidArgument(format!("invalid identifier {id:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeBusyStatus {
    Free,
    Busy,
}

/// Scheduling status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Confirmed,
    Cancelled,
    Tentative,
}

/// Progress of a task, overall or per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Progress {
    NeedsAction,
    InProcess,
    Completed,
    Failed,
    Cancelled,
}

/// Metadata shared by groups, events and tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Common {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<UtcDateTime>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_content_type: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl Common {
    #[must_use]
    pub fn with_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<impl Into<String>>) {
        self.title = optional_text(title);
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<impl Into<String>>) {
        self.description = optional_text(description);
    }

    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_locale(&mut self, locale: Option<impl Into<String>>) {
        self.locale = optional_text(locale);
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: Option<impl Into<String>>) {
        self.color = optional_text(color);
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.insert(keyword.into(), true);
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.insert(category.into(), true);
    }

    /// ## Summary
    /// Inserts a link, generating a random identifier when `id` is `None`.
    /// Returns the identifier the link was stored under.
    ///
    /// ## Errors
    /// Returns `InvalidArgument` when a supplied identifier is malformed.
    pub fn add_link(&mut self, id: Option<&str>, link: Link) -> ModelResult<String> {
        let id = match id {
            Some(id) => checked_id(id)?,
            None => loop {
                let candidate = generate_id();
                if !self.links.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        self.links.insert(id.clone(), link);
        Ok(id)
    }
}

/// Scheduling properties shared by events and tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sequence: u32,
    #[serde(default, skip_serializing_if = "is_zero_u8")]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_busy_status: Option<FreeBusyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_without_time: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, Relation>,
    /// Reply method (`imip`, `web`, ...) to URI.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reply_to: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    sent_by: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub excluded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_default_alerts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub time_zones: BTreeMap<String, TimeZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_id: Option<LocalDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_id_time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_recurrence_rules: Vec<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub recurrence_overrides: BTreeMap<LocalDateTime, PatchObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub participants: BTreeMap<String, Participant>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub virtual_locations: BTreeMap<String, VirtualLocation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alerts: BTreeMap<String, Alert>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localizations: BTreeMap<String, PatchObject>,
}

impl Schedule {
    #[must_use]
    pub fn sent_by(&self) -> Option<&str> {
        self.sent_by.as_deref()
    }

    pub fn set_sent_by(&mut self, sent_by: Option<impl Into<String>>) {
        self.sent_by = optional_text(sent_by);
    }

    /// Whether this object has any recurrence-defining property.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        !self.recurrence_rules.is_empty() || !self.recurrence_overrides.is_empty()
    }

    /// ## Errors
    /// Returns `InvalidArgument` when `id` is malformed.
    pub fn add_participant(&mut self, id: &str, participant: Participant) -> ModelResult<()> {
        self.participants.insert(checked_id(id)?, participant);
        Ok(())
    }

    /// ## Errors
    /// Returns `InvalidArgument` when `id` is malformed.
    pub fn add_location(&mut self, id: &str, location: Location) -> ModelResult<()> {
        self.locations.insert(checked_id(id)?, location);
        Ok(())
    }

    /// ## Errors
    /// Returns `InvalidArgument` when `id` is malformed.
    pub fn add_virtual_location(&mut self, id: &str, location: VirtualLocation) -> ModelResult<()> {
        self.virtual_locations.insert(checked_id(id)?, location);
        Ok(())
    }

    /// ## Errors
    /// Returns `InvalidArgument` when `id` is malformed.
    pub fn add_alert(&mut self, id: &str, alert: Alert) -> ModelResult<()> {
        self.alerts.insert(checked_id(id)?, alert);
        Ok(())
    }

    /// Adds a recurrence override. Pointers that would rewrite the identity
    /// or recurrence definition of the series are dropped.
    pub fn add_recurrence_override(&mut self, recurrence_id: LocalDateTime, patch: PatchObject) {
        self.recurrence_overrides
            .insert(recurrence_id, patch.for_recurrence_override());
    }

    pub fn add_localization(&mut self, language: impl Into<String>, patch: PatchObject) {
        self.localizations.insert(language.into(), patch);
    }

    pub fn add_related_to(&mut self, uid: impl Into<String>, relation: Relation) {
        self.related_to.insert(uid.into(), relation);
    }

    pub fn add_reply_to(&mut self, method: impl Into<String>, uri: impl Into<String>) {
        self.reply_to.insert(method.into(), uri.into());
    }

    pub fn add_time_zone(&mut self, time_zone: TimeZone) {
        self.time_zones.insert(time_zone.tz_id.clone(), time_zone);
    }

    /// Clears every property that defines or identifies a recurrence.
    pub(crate) fn clear_recurrence(&mut self) {
        self.recurrence_rules.clear();
        self.excluded_recurrence_rules.clear();
        self.recurrence_overrides.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_unset() {
        let mut common = Common::default();
        common.set_title(Some("Standup"));
        assert_eq!(common.title(), Some("Standup"));
        common.set_title(Some(""));
        assert!(common.title().is_none());
        common.set_color(None::<String>);
        assert!(common.color().is_none());

        let mut schedule = Schedule::default();
        schedule.set_sent_by(Some(""));
        assert!(schedule.sent_by().is_none());
    }

    #[test]
    fn empty_text_on_the_wire_is_unset() {
        let common: Common = serde_json::from_str(r#"{"uid":"a","title":""}"#).unwrap();
        assert!(common.title().is_none());
        let json = serde_json::to_string(&common).unwrap();
        assert!(!json.contains("title"));
    }

    #[test]
    fn add_link_generates_ids() {
        let mut common = Common::default();
        let first = common.add_link(None, Link::new("https://example.com/a")).unwrap();
        let second = common.add_link(None, Link::new("https://example.com/b")).unwrap();
        assert_ne!(first, second);
        assert!(is_valid_id(&first));
        assert_eq!(common.links.len(), 2);

        let named = common.add_link(Some("spec"), Link::new("https://example.com/c")).unwrap();
        assert_eq!(named, "spec");
        assert!(common.add_link(Some("bad id"), Link::new("x")).is_err());
    }

    #[test]
    fn maps_iterate_in_key_order() {
        let mut schedule = Schedule::default();
        schedule.add_alert("b", Alert::default()).unwrap();
        schedule.add_alert("a", Alert::default()).unwrap();
        let keys: Vec<_> = schedule.alerts.keys().cloned().collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn recurrence_override_drops_identity_pointers() {
        let mut schedule = Schedule::default();
        let mut patch = PatchObject::new();
        patch.insert("uid", serde_json::json!("other"));
        patch.insert("title", serde_json::json!("Moved"));
        let id: LocalDateTime = "2024-01-08T09:00:00".parse().unwrap();
        schedule.add_recurrence_override(id, patch);
        let stored = &schedule.recurrence_overrides[&id];
        assert!(stored.get("uid").is_none());
        assert!(stored.get("title").is_some());
    }
}
