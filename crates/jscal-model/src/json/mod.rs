//! JSON format adapter.
//!
//! ## Summary
//! Reads and writes `@type`-discriminated JSON objects. Parsing looks at the
//! discriminator first and hands the object to the matching type; writing
//! dispatches on the runtime kind of the object.

mod domain;
pub mod raw;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::entity::{
    AbsoluteTrigger, Alert, Event, Group, JsEntity, Link, Location, OffsetTrigger, Participant,
    Relation, Task, TimeZone, TimeZoneRule, UnknownTrigger, VirtualLocation,
};
use crate::error::{ModelError, ModelResult};
use crate::patch::PatchObject;
use crate::recurrence::{NDay, RecurrenceRule};

/// Every `@type` value the adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Group,
    Event,
    Task,
    Alert,
    AbsoluteTrigger,
    OffsetTrigger,
    UnknownTrigger,
    Link,
    Location,
    NDay,
    Participant,
    PatchObject,
    RecurrenceRule,
    Relation,
    TimeZone,
    TimeZoneRule,
    VirtualLocation,
}

impl ObjectType {
    pub const ALL: [Self; 17] = [
        Self::Group,
        Self::Event,
        Self::Task,
        Self::Alert,
        Self::AbsoluteTrigger,
        Self::OffsetTrigger,
        Self::UnknownTrigger,
        Self::Link,
        Self::Location,
        Self::NDay,
        Self::Participant,
        Self::PatchObject,
        Self::RecurrenceRule,
        Self::Relation,
        Self::TimeZone,
        Self::TimeZoneRule,
        Self::VirtualLocation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Event => "Event",
            Self::Task => "Task",
            Self::Alert => "Alert",
            Self::AbsoluteTrigger => "AbsoluteTrigger",
            Self::OffsetTrigger => "OffsetTrigger",
            Self::UnknownTrigger => "UnknownTrigger",
            Self::Link => "Link",
            Self::Location => "Location",
            Self::NDay => "NDay",
            Self::Participant => "Participant",
            Self::PatchObject => "PatchObject",
            Self::RecurrenceRule => "RecurrenceRule",
            Self::Relation => "Relation",
            Self::TimeZone => "TimeZone",
            Self::TimeZoneRule => "TimeZoneRule",
            Self::VirtualLocation => "VirtualLocation",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownObjectType(s.to_string()))
    }
}

/// Any object the adapter can read or write.
#[derive(Debug, Clone, PartialEq)]
pub enum JsObject {
    Group(Group),
    Event(Event),
    Task(Task),
    Alert(Alert),
    AbsoluteTrigger(AbsoluteTrigger),
    OffsetTrigger(OffsetTrigger),
    UnknownTrigger(UnknownTrigger),
    Link(Link),
    Location(Location),
    NDay(NDay),
    Participant(Participant),
    PatchObject(PatchObject),
    RecurrenceRule(RecurrenceRule),
    Relation(Relation),
    TimeZone(TimeZone),
    TimeZoneRule(TimeZoneRule),
    VirtualLocation(VirtualLocation),
}

impl JsObject {
    /// The `@type` of this object.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::Group(_) => ObjectType::Group,
            Self::Event(_) => ObjectType::Event,
            Self::Task(_) => ObjectType::Task,
            Self::Alert(_) => ObjectType::Alert,
            Self::AbsoluteTrigger(_) => ObjectType::AbsoluteTrigger,
            Self::OffsetTrigger(_) => ObjectType::OffsetTrigger,
            Self::UnknownTrigger(_) => ObjectType::UnknownTrigger,
            Self::Link(_) => ObjectType::Link,
            Self::Location(_) => ObjectType::Location,
            Self::NDay(_) => ObjectType::NDay,
            Self::Participant(_) => ObjectType::Participant,
            Self::PatchObject(_) => ObjectType::PatchObject,
            Self::RecurrenceRule(_) => ObjectType::RecurrenceRule,
            Self::Relation(_) => ObjectType::Relation,
            Self::TimeZone(_) => ObjectType::TimeZone,
            Self::TimeZoneRule(_) => ObjectType::TimeZoneRule,
            Self::VirtualLocation(_) => ObjectType::VirtualLocation,
        }
    }

    /// The top-level calendar object, if this is one.
    #[must_use]
    pub fn into_entity(self) -> Option<JsEntity> {
        match self {
            Self::Group(group) => Some(JsEntity::Group(group)),
            Self::Event(event) => Some(JsEntity::Event(event)),
            Self::Task(task) => Some(JsEntity::Task(task)),
            _ => None,
        }
    }

    fn from_value(object_type: ObjectType, value: Value) -> ModelResult<Self> {
        use raw::from_value;

        domain::check(object_type, &value).inspect_err(|err| {
            tracing::debug!(%object_type, code = err.code(), "Rejected JSON object");
        })?;
        Ok(match object_type {
            ObjectType::Group => Self::Group(from_value(value)?),
            ObjectType::Event => Self::Event(from_value(value)?),
            ObjectType::Task => Self::Task(from_value(value)?),
            ObjectType::Alert => Self::Alert(from_value(value)?),
            ObjectType::AbsoluteTrigger => Self::AbsoluteTrigger(from_value(value)?),
            ObjectType::OffsetTrigger => Self::OffsetTrigger(from_value(value)?),
            ObjectType::UnknownTrigger => Self::UnknownTrigger(from_value(value)?),
            ObjectType::Link => Self::Link(from_value(value)?),
            ObjectType::Location => Self::Location(from_value(value)?),
            ObjectType::NDay => Self::NDay(from_value(value)?),
            ObjectType::Participant => Self::Participant(from_value(value)?),
            ObjectType::PatchObject => Self::PatchObject(from_value(value)?),
            ObjectType::RecurrenceRule => Self::RecurrenceRule(from_value(value)?),
            ObjectType::Relation => Self::Relation(from_value(value)?),
            ObjectType::TimeZone => Self::TimeZone(from_value(value)?),
            ObjectType::TimeZoneRule => Self::TimeZoneRule(from_value(value)?),
            ObjectType::VirtualLocation => Self::VirtualLocation(from_value(value)?),
        })
    }

    fn to_value(&self) -> ModelResult<Value> {
        use raw::to_value;

        match self {
            Self::Group(o) => to_value(o),
            Self::Event(o) => to_value(o),
            Self::Task(o) => to_value(o),
            Self::Alert(o) => to_value(o),
            Self::AbsoluteTrigger(o) => to_value(o),
            Self::OffsetTrigger(o) => to_value(o),
            Self::UnknownTrigger(o) => to_value(o),
            Self::Link(o) => to_value(o),
            Self::Location(o) => to_value(o),
            Self::NDay(o) => to_value(o),
            Self::Participant(o) => to_value(o),
            Self::PatchObject(o) => {
                let mut value = to_value(o)?;
                if let Value::Object(map) = &mut value {
                    map.shift_insert(0, "@type".into(), PatchObject::NAME.into());
                }
                Ok(value)
            }
            Self::RecurrenceRule(o) => to_value(o),
            Self::Relation(o) => to_value(o),
            Self::TimeZone(o) => to_value(o),
            Self::TimeZoneRule(o) => to_value(o),
            Self::VirtualLocation(o) => to_value(o),
        }
    }
}

impl From<JsEntity> for JsObject {
    fn from(entity: JsEntity) -> Self {
        match entity {
            JsEntity::Group(group) => Self::Group(group),
            JsEntity::Event(event) => Self::Event(event),
            JsEntity::Task(task) => Self::Task(task),
        }
    }
}

/// ## Summary
/// Parses a JSON document into the object named by its `@type`.
///
/// ## Errors
/// Returns `ParseError` for malformed JSON or an object of the wrong shape,
/// `InvalidArgument` when the document is not an object with an `@type`
/// string, and `UnknownObjectType` for an unrecognized `@type`. Malformed
/// date-time or duration text anywhere in the object is reported as
/// `InvalidTemporalInput`, an invalid recurrence rule as
/// `RecurrenceConstraintViolation`.
#[tracing::instrument(skip(text), fields(len = text.len()))]
pub fn parse(text: &str) -> ModelResult<JsObject> {
    let value = raw::decode(text)?;
    let object_type = match value.get("@type") {
        Some(Value::String(name)) => name.parse::<ObjectType>()?,
        Some(_) => return Err(ModelError::InvalidArgument("@type must be a string".into())),
        None => return Err(ModelError::InvalidArgument("missing @type".into())),
    };
    tracing::debug!(%object_type, "Parsing JSON object");
    JsObject::from_value(object_type, value)
}

/// ## Summary
/// Writes an object as JSON, omitting absent properties.
///
/// ## Errors
/// Returns `EncodeError` when the object cannot be written.
pub fn write(object: &JsObject, pretty: bool) -> ModelResult<String> {
    raw::encode(&object.to_value()?, pretty)
}

/// ## Summary
/// Writes an object that the caller declares to be of `object_type`.
///
/// ## Errors
/// Returns `InvalidArgument` when the object is of another kind, otherwise
/// as [`write`].
pub fn write_as(object_type: ObjectType, object: &JsObject, pretty: bool) -> ModelResult<String> {
    if object.object_type() != object_type {
        return Err(ModelError::InvalidArgument(format!(
            "cannot write {} as {object_type}",
            object.object_type()
        )));
    }
    write(object, pretty)
}

/// Parses a JSON document that must hold a group, event or task.
///
/// ## Errors
/// As [`parse`], plus `InvalidArgument` for any other object kind.
pub fn parse_entity(text: &str) -> ModelResult<JsEntity> {
    let object = parse(text)?;
    let object_type = object.object_type();
    object.into_entity().ok_or_else(|| {
        ModelError::InvalidArgument(format!("expected Group, Event or Task, found {object_type}"))
    })
}

#[cfg(test)]
mod tests;
