//! Thin wrapper around `serde_json` that reports failures as model errors.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

pub const PARSE_ERROR_CODE: &str = "json.parse";
pub const ENCODE_ERROR_CODE: &str = "json.encode";

fn parse_error(err: &serde_json::Error) -> ModelError {
    ModelError::ParseError {
        code: PARSE_ERROR_CODE,
        message: err.to_string(),
    }
}

fn encode_error(err: &serde_json::Error) -> ModelError {
    ModelError::EncodeError {
        code: ENCODE_ERROR_CODE,
        message: err.to_string(),
    }
}

/// ## Errors
/// Returns `ParseError` when `text` is not valid JSON.
pub fn decode(text: &str) -> ModelResult<Value> {
    serde_json::from_str(text).map_err(|e| parse_error(&e))
}

/// ## Errors
/// Returns `EncodeError` when the value cannot be written.
pub fn encode(value: &Value, pretty: bool) -> ModelResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| encode_error(&e))
}

/// ## Errors
/// Returns `EncodeError` when `object` cannot be represented as JSON.
pub fn to_value<T: Serialize>(object: &T) -> ModelResult<Value> {
    serde_json::to_value(object).map_err(|e| encode_error(&e))
}

/// ## Errors
/// Returns `ParseError` when `value` does not have the shape of `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> ModelResult<T> {
    serde_json::from_value(value).map_err(|e| parse_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_surfaces_parse_errors() {
        let err = decode("{\"uid\": ").unwrap_err();
        assert_eq!(err.code(), PARSE_ERROR_CODE);
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn encode_compact_and_pretty() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(encode(&value, false).unwrap(), "{\"a\":1}");
        assert!(encode(&value, true).unwrap().contains('\n'));
    }
}
