//! Field-level serde helpers shared by the entity structs.

use serde::{Deserialize, Deserializer};

/// Reads an optional string, treating `""` as absent.
pub(crate) fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// Normalizes an optional text value: empty means unset.
pub(crate) fn optional_text(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|s| !s.is_empty())
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
pub(crate) fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
pub(crate) fn is_zero_u8(value: &u8) -> bool {
    *value == 0
}
