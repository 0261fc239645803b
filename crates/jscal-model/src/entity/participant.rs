use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Link;
use super::common::Progress;
use super::marker::ParticipantType;
use super::serde_util::{is_zero, non_empty, optional_text};
use crate::temporal::UtcDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationStatus {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

impl ParticipationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsAction => "needs-action",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Tentative => "tentative",
            Self::Delegated => "delegated",
        }
    }
}

/// Someone or something taking part in an event or task.
///
/// `invitedBy`, `delegatedTo`, `delegatedFrom` and `memberOf` hold keys of
/// the sibling `participants` map. `locationId` is a key of `locations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "@type", default)]
    object_type: ParticipantType,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Method (`imip`, `other`) to URI.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub send_to: BTreeMap<String, String>,
    /// `individual`, `group`, `location`, `resource`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_status: Option<ParticipationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_comment: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expect_reply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_agent: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub schedule_force_send: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub schedule_sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_updated: Option<UtcDateTime>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    sent_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub delegated_to: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub delegated_from: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub member_of: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_updated: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,
}

impl Participant {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<impl Into<String>>) {
        self.name = optional_text(name);
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<impl Into<String>>) {
        self.email = optional_text(email);
    }

    #[must_use]
    pub fn sent_by(&self) -> Option<&str> {
        self.sent_by.as_deref()
    }

    pub fn set_sent_by(&mut self, sent_by: Option<impl Into<String>>) {
        self.sent_by = optional_text(sent_by);
    }

    /// Adds a scheduling address; `imip` addresses get a `mailto:` scheme.
    pub fn add_send_to(&mut self, method: impl Into<String>, uri: impl Into<String>) {
        let method = method.into();
        let mut uri = uri.into();
        if method == "imip" && !uri.to_ascii_lowercase().starts_with("mailto:") {
            uri = format!("mailto:{uri}");
        }
        self.send_to.insert(method, uri);
    }

    pub fn add_role(&mut self, role: impl Into<String>) {
        self.roles.insert(role.into(), true);
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.get(role).copied().unwrap_or(false)
    }

    /// The `imip` address without its scheme, if any.
    #[must_use]
    pub fn imip_address(&self) -> Option<&str> {
        let uri = self.send_to.get("imip")?;
        Some(
            uri.get(..7)
                .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
                .map_or(uri.as_str(), |_| &uri[7..]),
        )
    }
}
