//! Pointer paths: `/`-separated segments with `~1` for `/` and `~0` for `~`.

use crate::error::{ModelError, ModelResult};

/// ## Summary
/// Splits a pointer into unescaped segments. A leading `/` is optional.
///
/// ## Errors
/// Returns `InvalidPatch` for an empty pointer, an empty segment or a
/// dangling `~` escape.
pub fn parse_pointer(pointer: &str) -> ModelResult<Vec<String>> {
    let path = pointer.strip_prefix('/').unwrap_or(pointer);
    if path.is_empty() {
        return Err(ModelError::InvalidPatch("empty pointer".into()));
    }

    path.split('/')
        .map(|segment| {
            if segment.is_empty() {
                return Err(ModelError::InvalidPatch(format!(
                    "empty segment in pointer {pointer:?}"
                )));
            }
            unescape(segment).ok_or_else(|| {
                ModelError::InvalidPatch(format!("bad escape in pointer {pointer:?}"))
            })
        })
        .collect()
}

fn unescape(segment: &str) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next()? {
                '0' => out.push('~'),
                '1' => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Escapes a property name for use as one pointer segment.
#[must_use]
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_unescapes() {
        assert_eq!(
            parse_pointer("/locations/a~1b/name").unwrap(),
            ["locations", "a/b", "name"]
        );
        assert_eq!(parse_pointer("title").unwrap(), ["title"]);
        assert_eq!(parse_pointer("x~0y").unwrap(), ["x~y"]);
    }

    #[test]
    fn rejects_malformed_pointers() {
        for pointer in ["", "/", "a//b", "a~", "a~2"] {
            assert!(parse_pointer(pointer).is_err(), "{pointer:?}");
        }
    }

    #[test]
    fn escape_is_inverse_of_parse() {
        let name = "2024-01-01T00:00:00/x~y";
        assert_eq!(parse_pointer(&escape_segment(name)).unwrap(), [name]);
    }
}
