//! The entity graph.
//!
//! ## Summary
//! Typed objects of the JSON calendar model. Each parent owns its children;
//! references between siblings (`invitedBy`, `locationId`, `relativeTo`)
//! are map keys, never object references. Id-keyed collections are
//! `BTreeMap`s and so always iterate in key order.

mod alert;
mod common;
mod event;
mod group;
mod link;
mod location;
pub(crate) mod marker;
mod participant;
mod serde_util;
mod task;
mod time_zone;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ModelResult;
use crate::json::raw;
use crate::patch::{PatchObject, PatchTarget};
use crate::temporal::LocalDateTime;

pub use alert::{AbsoluteTrigger, Alert, AlertAction, OffsetTrigger, Trigger, UnknownTrigger};
pub use common::{Common, FreeBusyStatus, Privacy, Progress, Schedule, Status};
pub use event::Event;
pub use group::{Entry, Group, JsEntity};
pub use link::{Link, Relation};
pub use location::{Location, VirtualLocation};
pub use participant::{Participant, ParticipationStatus};
pub use task::Task;
pub use time_zone::{TimeZone, TimeZoneRule};

/// Behaviour shared by events and tasks.
pub trait Scheduled: Clone + Serialize + DeserializeOwned {
    fn common(&self) -> &Common;
    fn common_mut(&mut self) -> &mut Common;
    fn schedule(&self) -> &Schedule;
    fn schedule_mut(&mut self) -> &mut Schedule;
    fn start(&self) -> Option<LocalDateTime>;
    fn set_start(&mut self, start: Option<LocalDateTime>);

    /// ## Summary
    /// Materializes the occurrence identified by `recurrence_id`.
    ///
    /// The occurrence starts at its recurrence id, carries no recurrence
    /// rules or overrides, and has the matching override applied. Returns
    /// `None` when the override excludes the occurrence.
    ///
    /// ## Errors
    /// Returns `InvalidPatch` when the override cannot be applied, or a JSON
    /// error when the patched object no longer has a valid shape.
    fn occurrence(&self, recurrence_id: LocalDateTime) -> ModelResult<Option<Self>> {
        let mut base = self.clone();
        base.schedule_mut().clear_recurrence();
        base.schedule_mut().recurrence_id = Some(recurrence_id);
        base.set_start(Some(recurrence_id));

        match self.schedule().recurrence_overrides.get(&recurrence_id) {
            None => Ok(Some(base)),
            Some(patch) if patch.excludes_occurrence() => Ok(None),
            Some(patch) => patched(&base, patch, PatchTarget::RecurrenceOverride).map(Some),
        }
    }

    /// ## Summary
    /// The object as seen in `language`: its localization patch applied and
    /// `locale` set. Unknown languages return an unchanged copy.
    ///
    /// ## Errors
    /// Returns `InvalidPatch` when the localization cannot be applied.
    fn localized(&self, language: &str) -> ModelResult<Self> {
        let Some(patch) = self.schedule().localizations.get(language) else {
            return Ok(self.clone());
        };
        let mut localized = patched(self, patch, PatchTarget::Localization)?;
        localized.common_mut().set_locale(Some(language));
        Ok(localized)
    }
}

/// Applies `patch` to the JSON form of `base` and reads the result back.
pub(crate) fn patched<T>(base: &T, patch: &PatchObject, target: PatchTarget) -> ModelResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let value = raw::to_value(base)?;
    raw::from_value(patch.apply(&value, target)?)
}
