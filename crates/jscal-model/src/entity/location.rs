use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Link;
use super::marker::{LocationType, VirtualLocationType};
use super::serde_util::{non_empty, optional_text};

/// A physical location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "@type", default)]
    object_type: LocationType,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub location_types: BTreeMap<String, bool>,
    /// `start` or `end`; absent means `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// A `geo:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl Location {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: optional_text(Some(name)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<impl Into<String>>) {
        self.name = optional_text(name);
    }
}

/// A virtual meeting place such as a video conference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualLocation {
    #[serde(rename = "@type", default)]
    object_type: VirtualLocationType,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub uri: String,
    /// `audio`, `chat`, `feed`, `moderator`, `phone`, `screen`, `video`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, bool>,
}

impl VirtualLocation {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<impl Into<String>>) {
        self.name = optional_text(name);
    }
}
