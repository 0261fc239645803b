//! Zero-sized `@type` markers.
//!
//! Each object kind carries its marker in the `@type` field. The marker
//! always serializes to its fixed name and refuses any other name on input.

macro_rules! type_marker {
    ($($(#[$meta:meta])* $name:ident => $tag:literal;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $name {
                pub const NAME: &'static str = $tag;
            }

            impl serde::Serialize for $name {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(Self::NAME)
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let found = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
                    if found == Self::NAME {
                        Ok(Self)
                    } else {
                        Err(serde::de::Error::invalid_value(
                            serde::de::Unexpected::Str(&found),
                            &concat!("\"", $tag, "\""),
                        ))
                    }
                }
            }
        )+
    };
}

type_marker! {
    GroupType => "Group";
    EventType => "Event";
    TaskType => "Task";
    AlertType => "Alert";
    AbsoluteTriggerType => "AbsoluteTrigger";
    OffsetTriggerType => "OffsetTrigger";
    LinkType => "Link";
    LocationType => "Location";
    NDayType => "NDay";
    ParticipantType => "Participant";
    RecurrenceRuleType => "RecurrenceRule";
    RelationType => "Relation";
    TimeZoneType => "TimeZone";
    TimeZoneRuleType => "TimeZoneRule";
    VirtualLocationType => "VirtualLocation";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_round_trip() {
        assert_eq!(serde_json::to_string(&EventType).unwrap(), "\"Event\"");
        assert!(serde_json::from_str::<EventType>("\"Event\"").is_ok());
        assert!(serde_json::from_str::<EventType>("\"Task\"").is_err());

        let err = serde_json::from_str::<GroupType>("\"Calendar\"").unwrap_err();
        assert!(err.to_string().contains("expected \"Group\""));
        assert_eq!(serde_json::to_string(&VirtualLocationType).unwrap(), "\"VirtualLocation\"");
    }
}
