//! Typed model of JSON calendar data.
//!
//! ## Summary
//! The entity graph (`Group`, `Event`, `Task` and their sub-objects), the
//! temporal codec for date-times and durations, recurrence rules with their
//! cross-field constraints, patch objects for recurrence exceptions and
//! localizations, and the JSON format adapter.

pub mod entity;
pub mod error;
pub mod json;
pub mod patch;
pub mod recurrence;
pub mod temporal;

pub use entity::{Entry, Event, Group, JsEntity, Task};
pub use error::{ModelError, ModelResult};
pub use json::{JsObject, ObjectType};
pub use patch::{PatchObject, PatchTarget};
pub use recurrence::RecurrenceRule;
pub use temporal::{Duration, LocalDateTime, TemporalInput, UtcDateTime};
