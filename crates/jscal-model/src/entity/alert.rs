//! Alerts and their triggers.

use std::collections::BTreeMap;

use jscal_core::constants::DEFAULT_RELATIVE_TO;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::Relation;
use super::marker::{AbsoluteTriggerType, AlertType, OffsetTriggerType};
use crate::temporal::{Duration, UtcDateTime};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    #[default]
    Display,
    Email,
}

/// Fires at a fixed instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteTrigger {
    #[serde(rename = "@type", default)]
    object_type: AbsoluteTriggerType,
    pub when: UtcDateTime,
}

impl AbsoluteTrigger {
    #[must_use]
    pub fn new(when: UtcDateTime) -> Self {
        Self {
            object_type: AbsoluteTriggerType,
            when,
        }
    }
}

/// Fires at an offset from the start or end of the owning object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetTrigger {
    #[serde(rename = "@type", default)]
    object_type: OffsetTriggerType,
    pub offset: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
}

impl OffsetTrigger {
    #[must_use]
    pub fn new(offset: Duration) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// `start` or `end`.
    #[must_use]
    pub fn relative_to(&self) -> &str {
        self.relative_to.as_deref().unwrap_or(DEFAULT_RELATIVE_TO)
    }

    #[must_use]
    pub fn is_relative_to_end(&self) -> bool {
        self.relative_to() == "end"
    }
}

/// A trigger of a kind this model does not know. Its properties are kept
/// verbatim so that they survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownTrigger {
    pub properties: Map<String, Value>,
}

impl UnknownTrigger {
    pub const NAME: &'static str = "UnknownTrigger";
}

impl Serialize for UnknownTrigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_type = self.properties.contains_key("@type");
        let mut map = serializer.serialize_map(Some(self.properties.len() + usize::from(!has_type)))?;
        if !has_type {
            map.serialize_entry("@type", Self::NAME)?;
        }
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UnknownTrigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            properties: Map::deserialize(deserializer)?,
        })
    }
}

/// When an alert fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Trigger {
    Absolute(AbsoluteTrigger),
    Offset(OffsetTrigger),
    Unknown(UnknownTrigger),
}

impl Default for Trigger {
    fn default() -> Self {
        Self::Offset(OffsetTrigger::default())
    }
}

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        let Value::Object(properties) = value else {
            return Err(D::Error::custom("trigger must be an object"));
        };
        match properties.get("@type").and_then(Value::as_str) {
            Some(AbsoluteTriggerType::NAME) => serde_json::from_value(Value::Object(properties))
                .map(Self::Absolute)
                .map_err(D::Error::custom),
            Some(OffsetTriggerType::NAME) => serde_json::from_value(Value::Object(properties))
                .map(Self::Offset)
                .map_err(D::Error::custom),
            _ => Ok(Self::Unknown(UnknownTrigger { properties })),
        }
    }
}

/// A reminder attached to an event or task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "@type", default)]
    object_type: AlertType,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<UtcDateTime>,
    /// Other alerts of the same object, by id (`parent` for snoozes).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AlertAction>,
}

impl Alert {
    #[must_use]
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn action(&self) -> AlertAction {
        self.action.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trigger_variants_dispatch_on_type() {
        let offset: Trigger =
            serde_json::from_value(json!({"@type": "OffsetTrigger", "offset": "-PT15M"})).unwrap();
        let Trigger::Offset(offset) = offset else {
            panic!("expected an offset trigger");
        };
        assert_eq!(offset.offset.to_string(), "-PT15M");
        assert_eq!(offset.relative_to(), "start");

        let absolute: Trigger = serde_json::from_value(
            json!({"@type": "AbsoluteTrigger", "when": "2024-01-01T08:00:00Z"}),
        )
        .unwrap();
        assert!(matches!(absolute, Trigger::Absolute(_)));

        let vendor = json!({"@type": "example.com:LocationTrigger", "radius": 100});
        let unknown: Trigger = serde_json::from_value(vendor.clone()).unwrap();
        assert!(matches!(unknown, Trigger::Unknown(_)));
        assert_eq!(serde_json::to_value(&unknown).unwrap(), vendor);
    }

    #[test]
    fn unknown_trigger_gets_a_type() {
        let trigger = Trigger::Unknown(UnknownTrigger::default());
        assert_eq!(
            serde_json::to_value(&trigger).unwrap(),
            json!({"@type": "UnknownTrigger"})
        );
    }

    #[test]
    fn malformed_known_trigger_is_an_error() {
        let result = serde_json::from_value::<Trigger>(json!({"@type": "OffsetTrigger"}));
        assert!(result.is_err());
    }
}
