//! Document-level conversions between JSON and iCalendar text.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use jscal_core::util::id::generate_id;
use jscal_ical::{IcalConfig, ParseOptions, from_ics, to_ics};
use jscal_model::{Entry, Group, JsEntity, JsObject, json};

/// Document formats the converter reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Ics,
}

impl Format {
    /// Guesses the format of `path` from its extension.
    #[must_use]
    pub fn of_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" | "jscal" => Some(Self::Json),
            "ics" | "ical" | "ifb" => Some(Self::Ics),
            _ => None,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Json => Self::Ics,
            Self::Ics => Self::Json,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Ics => "ics",
        })
    }
}

/// How a conversion reads and writes its documents.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub ical: IcalConfig,
    pub parse: ParseOptions,
    pub pretty: bool,
}

/// ## Summary
/// Reads a group, event or task from `text` in `format`.
///
/// ## Errors
/// Fails when the text is malformed or holds another kind of object.
pub fn read(text: &str, format: Format, options: &Options) -> Result<JsEntity> {
    let entity = match format {
        Format::Json => json::parse_entity(text).context("Invalid JSON calendar data")?,
        Format::Ics => from_ics(text, &options.parse).context("Invalid iCalendar data")?,
    };
    Ok(if options.parse.force_group {
        into_group(entity)
    } else {
        entity
    })
}

/// ## Summary
/// Writes `entity` as `format` text.
///
/// ## Errors
/// Fails when the entity cannot be expressed in the target format.
pub fn write(entity: &JsEntity, format: Format, options: &Options) -> Result<String> {
    match format {
        Format::Json => Ok(json::write(&JsObject::from(entity.clone()), options.pretty)?),
        Format::Ics => Ok(to_ics(entity, &options.ical)?),
    }
}

/// ## Summary
/// Converts a document from `from` to `to`.
///
/// ## Errors
/// As [`read`] and [`write`].
#[tracing::instrument(skip(text, options), fields(bytes = text.len()))]
pub fn convert(text: &str, from: Format, to: Format, options: &Options) -> Result<String> {
    let entity = read(text, from, options)?;
    tracing::debug!(uid = %entity.uid(), "Read calendar object");
    write(&entity, to, options)
}

/// Wraps a lone event or task in a new group.
#[must_use]
pub fn into_group(entity: JsEntity) -> JsEntity {
    let entry: Entry = match entity {
        JsEntity::Group(_) => return entity,
        JsEntity::Event(event) => event.into(),
        JsEntity::Task(task) => task.into(),
    };
    let mut group = Group::new(generate_id());
    group.common.prod_id.clone_from(&entry.common().prod_id);
    group.add_entry(entry);
    JsEntity::Group(group)
}

/// What `check` reports about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub kind: &'static str,
    pub uid: String,
    pub entries: usize,
    pub overrides: usize,
}

impl Summary {
    #[must_use]
    pub fn of(entity: &JsEntity) -> Self {
        let (kind, entries, overrides) = match entity {
            JsEntity::Group(group) => (
                "Group",
                group.entries.len(),
                group
                    .entries
                    .iter()
                    .map(|entry| entry.schedule().recurrence_overrides.len())
                    .sum(),
            ),
            JsEntity::Event(event) => ("Event", 1, event.schedule.recurrence_overrides.len()),
            JsEntity::Task(task) => ("Task", 1, task.schedule.recurrence_overrides.len()),
        };
        Self {
            kind,
            uid: entity.uid().to_string(),
            entries,
            overrides,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} entr{}, {} recurrence override{}",
            self.kind,
            self.uid,
            self.entries,
            if self.entries == 1 { "y" } else { "ies" },
            self.overrides,
            if self.overrides == 1 { "" } else { "s" },
        )
    }
}

#[cfg(test)]
mod tests;
