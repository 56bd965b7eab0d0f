//! Byte blobs for persistence collaborators: bincode framing around the
//! canonical JSON form.

use serde::{de::DeserializeOwned, Serialize};
use tt_core::{from_json_slice, to_canonical_json_bytes, ErrorInfo, TimetableError};

use crate::cache::CacheEntry;
use crate::history::HistoryRecord;

fn to_blob<T: Serialize>(value: &T) -> Result<Vec<u8>, TimetableError> {
    let json = to_canonical_json_bytes(value)?;
    bincode::serialize(&json)
        .map_err(|err| TimetableError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

fn from_blob<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TimetableError> {
    let json: Vec<u8> = bincode::deserialize(bytes)
        .map_err(|err| TimetableError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string())))?;
    from_json_slice(&json)
}

/// Serializes a cache entry into a blob.
pub fn entry_to_bytes(entry: &CacheEntry) -> Result<Vec<u8>, TimetableError> {
    to_blob(entry)
}

/// Rehydrates a cache entry from a blob.
pub fn entry_from_bytes(bytes: &[u8]) -> Result<CacheEntry, TimetableError> {
    from_blob(bytes)
}

/// Serializes a history record into a blob.
pub fn record_to_bytes(record: &HistoryRecord) -> Result<Vec<u8>, TimetableError> {
    to_blob(record)
}

/// Rehydrates a history record from a blob.
pub fn record_from_bytes(bytes: &[u8]) -> Result<HistoryRecord, TimetableError> {
    from_blob(bytes)
}
