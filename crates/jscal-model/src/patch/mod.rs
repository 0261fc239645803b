//! Patch objects: sparse overrides applied onto a base object.
//!
//! ## Summary
//! A [`PatchObject`] maps pointer paths to replacement values. `null`
//! deletes the addressed property. Patches are used for recurrence
//! overrides (keyed by recurrence id) and localizations (keyed by language
//! tag).

mod pointer;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};

pub use pointer::{escape_segment, parse_pointer};

/// Pointer prefixes an override may not touch: they define the identity or
/// the recurrence of the series.
pub const EXCLUDED_OVERRIDE_PREFIXES: [&str; 14] = [
    "@type",
    "excludedRecurrenceRules",
    "method",
    "privacy",
    "prodId",
    "recurrenceId",
    "recurrenceIdTimeZone",
    "recurrenceOverrides",
    "recurrenceRules",
    "relatedTo",
    "replyTo",
    "sentBy",
    "timeZones",
    "uid",
];

/// What a patch is applied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTarget {
    RecurrenceOverride,
    Localization,
}

/// Whether an override must ignore `pointer`.
#[must_use]
pub fn is_excluded_from_override(pointer: &str) -> bool {
    let path = pointer.strip_prefix('/').unwrap_or(pointer);
    EXCLUDED_OVERRIDE_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// A sparse overlay: pointer path to replacement value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchObject(BTreeMap<String, Value>);

impl<'de> Deserialize<'de> for PatchObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
        // A standalone patch carries its kind like any other object.
        if entries.get("@type").and_then(Value::as_str) == Some(Self::NAME) {
            entries.remove("@type");
        }
        Ok(Self(entries))
    }
}

impl PatchObject {
    pub const NAME: &'static str = "PatchObject";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pointer: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(pointer.into(), value)
    }

    pub fn remove(&mut self, pointer: &str) -> Option<Value> {
        self.0.remove(pointer)
    }

    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.0.get(pointer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether the patch removes its occurrence (`excluded: true`).
    #[must_use]
    pub fn excludes_occurrence(&self) -> bool {
        self.0.get("excluded").and_then(Value::as_bool) == Some(true)
    }

    /// The patch with every pointer an override may not touch removed.
    #[must_use]
    pub fn for_recurrence_override(mut self) -> Self {
        self.0.retain(|pointer, _| {
            let keep = !is_excluded_from_override(pointer);
            if !keep {
                tracing::debug!(%pointer, "Dropping excluded pointer from recurrence override");
            }
            keep
        });
        self
    }

    /// ## Summary
    /// Applies the patch to a copy of `base`.
    ///
    /// Pointers are applied in key order, so a replaced object is in place
    /// before pointers into it are applied. Missing intermediate objects are
    /// created. For recurrence overrides, excluded pointers are skipped.
    ///
    /// ## Errors
    /// Returns `InvalidPatch` when `base` is not an object, a pointer is
    /// malformed, or a pointer goes through a value that is not an object.
    pub fn apply(&self, base: &Value, target: PatchTarget) -> ModelResult<Value> {
        let Value::Object(root) = base else {
            return Err(ModelError::InvalidPatch("patch target is not an object".into()));
        };
        let mut root = root.clone();

        for (pointer, value) in &self.0 {
            if target == PatchTarget::RecurrenceOverride && is_excluded_from_override(pointer) {
                tracing::debug!(%pointer, "Ignoring excluded pointer in recurrence override");
                continue;
            }
            let segments = parse_pointer(pointer)?;
            set_path(&mut root, pointer, &segments, value)?;
        }

        Ok(Value::Object(root))
    }

    /// ## Summary
    /// The top-level difference between two objects: changed and added
    /// properties with their new value, removed properties as `null`.
    ///
    /// Non-object inputs produce an empty patch.
    #[must_use]
    pub fn diff(base: &Value, variant: &Value) -> Self {
        let (Value::Object(base), Value::Object(variant)) = (base, variant) else {
            return Self::default();
        };

        let mut patch = Self::default();
        for (key, value) in variant {
            if base.get(key) != Some(value) {
                patch.insert(escape_segment(key), value.clone());
            }
        }
        for key in base.keys().filter(|k| !variant.contains_key(*k)) {
            patch.insert(escape_segment(key), Value::Null);
        }
        patch
    }
}

impl FromIterator<(String, Value)> for PatchObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn set_path(
    root: &mut Map<String, Value>,
    pointer: &str,
    segments: &[String],
    value: &Value,
) -> ModelResult<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(ModelError::InvalidPatch(format!("empty pointer {pointer:?}")));
    };

    let mut current = root;
    for segment in parents {
        let child = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match child {
            Value::Object(map) => map,
            _ => {
                return Err(ModelError::InvalidPatch(format!(
                    "pointer {pointer:?} goes through a non-object at {segment:?}"
                )));
            }
        };
    }

    if value.is_null() {
        current.remove(last);
    } else {
        current.insert(last.clone(), value.clone());
    }
    Ok(())
}
