//! Canonical JSON: every object is written with its keys in byte order and
//! without insignificant whitespace, so equal values always encode to equal
//! bytes. Fingerprints, cache entries and history lines all go through here.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, TimetableError};

fn encoding_error(code: &str, err: serde_json::Error) -> TimetableError {
    TimetableError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("category", format!("{:?}", err.classify())),
    )
}

/// Reorders the keys of every nested object in place.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = std::mem::take(map)
                .into_iter()
                .map(|(key, mut inner)| {
                    sort_keys(&mut inner);
                    (key, inner)
                })
                .collect();
            map.extend(sorted);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

fn write_canonical<T: Serialize, W: Write>(writer: W, value: &T) -> Result<(), TimetableError> {
    let mut tree = serde_json::to_value(value).map_err(|err| encoding_error("json-serialize", err))?;
    sort_keys(&mut tree);
    serde_json::to_writer(writer, &tree).map_err(|err| encoding_error("json-write", err))
}

/// Encodes `value` as canonical JSON.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, TimetableError> {
    let mut out = Vec::with_capacity(256);
    write_canonical(&mut out, value)?;
    Ok(out)
}

/// Encodes `value` as one canonical JSON line, terminated by `\n`.
///
/// Canonical output never contains a raw newline, so the result is always a
/// single line.
pub fn to_canonical_json_line<T: Serialize>(value: &T) -> Result<Vec<u8>, TimetableError> {
    let mut out = to_canonical_json_bytes(value)?;
    out.push(b'\n');
    Ok(out)
}

/// Decodes JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, TimetableError> {
    serde_json::from_slice(data).map_err(|err| encoding_error("json-deserialize", err))
}
