//! Object identifier helpers.
//!
//! ## Summary
//! Identifiers key the id-keyed maps of the entity graph (links,
//! participants, locations, alerts...). A valid identifier is 1 to 255
//! characters drawn from ASCII letters, digits, hyphen and underscore.

use crate::constants::MAX_ID_LEN;

/// Generates a fresh random identifier.
///
/// The identifier is the simple (unhyphenated) form of a v4 UUID: 32
/// lowercase hex characters.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Returns whether `id` is usable as an object identifier.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Derives an identifier from arbitrary text.
///
/// Invalid characters become hyphens, runs of hyphens collapse and the
/// result is truncated to the maximum length. Falls back to a random
/// identifier when nothing usable remains.
#[must_use]
pub fn sanitize_id(raw: &str) -> String {
    let id = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if id.is_empty() {
        return generate_id();
    }

    id.chars().take(MAX_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid_and_unique() {
        let a = generate_id();
        let b = generate_id();
        assert!(is_valid_id(&a));
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn validity_rules() {
        assert!(is_valid_id("link-1_a"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id(&"x".repeat(256)));
        assert!(is_valid_id(&"x".repeat(255)));
    }

    #[test]
    fn sanitize_mailto() {
        assert_eq!(sanitize_id("mailto:jane@example.com"), "mailto-jane-example-com");
    }

    #[test]
    fn sanitize_empty_falls_back_to_random() {
        assert!(is_valid_id(&sanitize_id("@@@")));
    }
}
