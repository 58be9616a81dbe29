use std::collections::BTreeMap;
use std::iter::FromIterator;

use libra_core::errors::{ErrorInfo, LibraError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> LibraError {
    LibraError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LibraError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Serializes a value into pretty-printed JSON.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, LibraError> {
    serde_json::to_string_pretty(value).map_err(|err| serde_error("json-encode", err))
}

/// Restores a value from JSON text.
pub fn from_json_str<T: DeserializeOwned>(data: &str) -> Result<T, LibraError> {
    serde_json::from_str(data).map_err(|err| serde_error("json-read", err))
}

/// Restores a value from YAML text.
pub fn from_yaml_str<T: DeserializeOwned>(data: &str) -> Result<T, LibraError> {
    serde_yaml::from_str(data).map_err(|err| serde_error("yaml-read", err))
}
